use heap_steps::{Config, Session, Step};

fn main() -> heap_steps::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    // a small roster so the whole sort fits on screen
    let config = Config {
        initial_people: 6,
        ..Config::default()
    };
    let mut session = Session::new(config)?;
    print_heap("start", &session);

    // a new person joins and sifts up
    let (id, steps) = session.add_person(140.0)?;
    println!("\nadding person {id}");
    steps.iter().for_each(print_step);

    // the heaviest person leaves
    println!("\nextracting the root");
    session.extract_one().iter().for_each(print_step);

    // everyone else, heaviest first
    let preview = session.preview();
    let run = session.sort_all();
    assert_eq!(run.sorted, preview);
    println!("\nsorted in {} steps:", run.steps.len());
    for person in session.sorted() {
        println!("  {person}");
    }

    Ok(())
}

fn print_heap(label: &str, session: &Session) {
    let weights: Vec<f64> = session.heap().snapshot().iter().map(|p| p.weight()).collect();
    println!("{label}: {weights:?}");
}

fn print_step(step: &Step) {
    let slots: Vec<String> = step
        .snapshot
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let mark = if step.is_highlighted(i) { "*" } else { "" };
            if slot.is_ghost() {
                format!("({mark}_)")
            } else {
                format!("{mark}{}", slot.entity.weight())
            }
        })
        .collect();
    let kind = format!("{:?}", step.kind);
    println!("  {kind:<8} [{}] {}", slots.join(" "), step.description);
}
