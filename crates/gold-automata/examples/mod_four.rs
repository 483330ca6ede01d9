// Build the mod-4 counting automaton and its transducer, then run the tapes
// given on the command line (default: a few runs of `a`).
//
// Run: RUST_LOG=gold_automata=debug cargo run -p gold-automata --example mod_four -- aaa aaaa

use gold_automata::{Acceptor, DeterministicAutomaton, DeterministicTransducer, Dispatcher, to};
use gold_core::sets::{between, product, union};
use gold_core::{AutomataError, State};

fn int(state: &State) -> i64 {
    state.as_int().unwrap_or_default()
}

fn delta() -> Dispatcher {
    Dispatcher::new("delta")
        .on_state(|s, _| {
            let n = int(s);
            if n % 2 == 0 { to((n, 2)) } else { to((n + 1) % 4) }
        })
        .on_pair(|s, extra, _| to((int(s) + int(extra) + 1) % 4))
}

fn main() -> Result<(), AutomataError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let scalars = between(0, 3);
    let pairs = product(&[scalars.clone(), vec![State::from(2)]]);
    let states: Vec<State> = union([scalars, pairs]).into_iter().collect();

    let dfa = DeterministicAutomaton::new(states.clone(), "a", 0, [3], delta())?;
    let output = Dispatcher::new("trans")
        .on_state(|s, _| Ok(Some(if int(s) % 2 == 0 { 'a' } else { 'b' })))
        .on_pair(|_, _, _| Ok(Some('c')));
    let transducer = DeterministicTransducer::new(states, "a", "abc", 0, [3], delta(), output)?;

    println!("Edges:");
    for edge in dfa.graph().edges() {
        println!("  {} -[{}]-> {}", edge.source, edge.label(), edge.target);
    }

    let mut tapes: Vec<String> = std::env::args().skip(1).collect();
    if tapes.is_empty() {
        tapes = ["", "a", "aa", "aaa", "aaaa"].map(String::from).to_vec();
    }

    for tape in &tapes {
        let (accepted, path) = dfa.accepts_with_path(tape)?;
        let (translated, _) = transducer.transduce(tape)?;
        println!("{tape:?}: accepted={accepted} output={translated:?}");
        for step in &path {
            println!("    {step}");
        }
    }
    Ok(())
}
