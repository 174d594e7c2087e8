mod flow;
mod link;
mod specialty;
mod step;

pub use flow::{FlowModel, FlowOrigin};
pub use link::StepLink;
pub use specialty::SpecialtyModel;
pub use step::{StepId, StepModel, StoredPosition};
