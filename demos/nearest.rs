//! Pick the nearest reachable cell in a small warehouse.
//!
//! Run: cargo run --bin nearest -- [alphabetical|random] [seed]

use gridpick_demos::{navigator, render, report, warehouse};
use gridpick_select::{
    NearestCellSelector, SelectorConfig, TiebreakMode, TiebreakerConfig, TiebreakerService,
};

fn main() {
    let mut args = std::env::args().skip(1);
    let mode = match args.next().map(|s| s.parse::<TiebreakMode>()).transpose() {
        Ok(mode) => mode.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let layout = warehouse();
    let nav = match navigator(&layout) {
        Ok(nav) => nav,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let tiebreaker = TiebreakerService::new(TiebreakerConfig {
        mode,
        seed,
        enable_logging: true,
    });
    let mut selector = NearestCellSelector::new(SelectorConfig { top_n: 4 })
        .with_navigator(nav)
        .with_tiebreaker(tiebreaker);

    let robot = layout.dock;
    let cells = layout.available_cells();
    println!("robot at {robot}, {} available cells, mode {mode}, seed {seed}", cells.len());

    let rep = report(&mut selector, robot, &cells);
    println!("\nranking:");
    for (i, r) in rep.ranking.iter().enumerate() {
        println!("  {}. {r}", i + 1);
    }
    match &rep.nearest {
        Some(c) => println!("\nnearest: {c}"),
        None => println!("\nno reachable cell"),
    }

    if let Some(nav) = selector.navigator() {
        println!("\n{}", render(&layout, nav, rep.nearest.as_ref()));
        println!("searches {}, cache {}", nav.searches(), nav.cache_stats());
    }
}
