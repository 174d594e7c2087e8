use medflow::{FlowModel, FlowOrigin, FlowServiceBuilder, LayoutConfig, SpecialtyModel, StepModel};

fn main() -> medflow::Result<()> {
    let service = FlowServiceBuilder::new()
        .layout(LayoutConfig {
            step_spacing: 200.0,
            ..Default::default()
        })
        .build()?;

    service.register_specialty(&SpecialtyModel {
        id: "sp-cardio".to_string(),
        code: "CARD".to_string(),
        name: "Cardiology".to_string(),
        is_active: true,
    })?;

    let ideal = FlowModel::from_json(include_str!("flow.json"))?;
    service.deploy(&ideal)?;

    let mut observed = FlowModel::new("bm-cardio-17", "Chest pain (observed)").with_specialty(Some("sp-cardio"), Some("Cardiology")).with_origin(FlowOrigin::Generated);
    for (idx, (id, code, label, minutes, cost)) in [("o1", "st-cons", "Triage", 20.0, 20000.0), ("o2", "st-img", "Chest X-ray", 40.0, 60000.0), ("o3", "st-cons", "Cardiology consult", 60.0, 95000.0)].into_iter().enumerate() {
        let mut step = StepModel::new(id, code, label);
        step.order_index = Some(idx as i64);
        step.duration_minutes = Some(minutes);
        step.cost_avg = Some(cost);
        observed = observed.with_step(step);
    }
    service.deploy(&observed)?;

    let diagram = service.diagram(&ideal.id)?;
    println!("{}", diagram.schema());

    if let Some(comparison) = service.compare_specialty("cardiology")? {
        println!();
        println!("efficiency: {:.1}% ({})", comparison.efficiency(), comparison.rating().as_ref());
        for rec in comparison.recommendations.iter() {
            println!("  - {}", rec);
        }
    }

    println!();
    println!("{:#?}", service.statistics()?);

    Ok(())
}
