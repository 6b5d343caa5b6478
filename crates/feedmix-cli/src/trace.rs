use feedmix_solver::{IterationObserver, PivotEvent};

/// Prints one block per pivot to stdout
#[derive(Debug, Default)]
pub struct Narrator;

impl IterationObserver for Narrator {
    fn on_pivot(&mut self, event: &PivotEvent) {
        println!("Iteration {}:", event.iteration);
        println!("  Entering: x{}", event.entering + 1);
        println!("  Leaving:  x{} (row {})", event.leaving + 1, event.leaving_row + 1);
        println!("  Pivot element: {:.4}", event.pivot_value);
    }
}
