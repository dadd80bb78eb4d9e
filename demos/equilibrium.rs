use monopolist::{EquilibriumSolver, equilibrium_summary, model_summary, normalize};

fn main() {
    let mut args = std::env::args().skip(1);
    let demand = args.next().unwrap_or_else(|| "100 - Q".to_string());
    let cost = args.next().unwrap_or_else(|| "10 + 2Q".to_string());

    let solver: EquilibriumSolver = EquilibriumSolver::default();
    let (demand, cost) = match solver.validate_pair(&normalize(&demand), &normalize(&cost)) {
        Ok(pair) => pair,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let model = match solver.model(&demand, &cost) {
        Ok(model) => model,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    for line in model_summary(&model) {
        println!("{line}");
    }

    match solver.solve_model(&model) {
        Ok(record) => {
            println!();
            for line in equilibrium_summary(&record) {
                println!("{line}");
            }
            let curves = solver.curves(&model, &record);
            let stride = (curves.len() / 5).max(1);
            println!();
            for i in (0..curves.len()).step_by(stride) {
                println!(
                    "Q = {:>8.2}  P = {:>8.2}  π = {:>10.2}",
                    curves.quantities[i], curves.prices[i], curves.profits[i]
                );
            }
        }
        Err(err) => eprintln!("{err}"),
    }
}
