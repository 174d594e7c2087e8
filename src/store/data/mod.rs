mod flow;
mod specialty;

pub use flow::Flow;
pub use specialty::Specialty;
