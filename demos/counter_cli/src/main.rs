use std::io::{self, BufRead, Write};

use tally_core::prelude::*;
use tally_devtools::Inspector;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let store = CounterStore::with_config(StoreConfig::new().trace_actions(true));
    let inspector = Inspector::attach(&store, 64);
    let view = Scope::new();
    let _count = view.subscribe(&store, current_count, |n: &f64| println!("Count: {n}"));

    println!("Count: {}", store.select(current_count));
    println!("enter an amount, `reset`, `log` or `quit`");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            "quit" | "exit" => break,
            "reset" => store.dispatch(reset()),
            "log" => {
                for entry in inspector.log().entries() {
                    println!("#{} {}", entry.seq, entry.action);
                }
                println!("{}", inspector.summary());
            }
            text => {
                if !dispatch_amount(&store, text) {
                    log::info!("not a number: {text:?}");
                }
            }
        }
        io::stdout().flush()?;
    }

    view.dispose();
    store.teardown();
    Ok(())
}
