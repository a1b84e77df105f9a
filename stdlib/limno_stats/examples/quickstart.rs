//! Compare dissolved-oxygen readings from two sampling stations.
//!
//! Run with `RUST_LOG=debug` to see provider resolution.

use limno_stats::{Alternative, HypothesisEngine, StatsError, TestConfig};

fn main() -> Result<(), StatsError> {
    env_logger::init();

    let inlet = [8.4, 8.9, 8.1, 9.2, 8.7, 8.8, 9.0, 8.5];
    let outlet = [7.6, 8.0, 7.9, 8.3, 7.4, 8.1, 7.8, 8.2];
    let engine = HypothesisEngine::new();
    println!("providers: {:?}", engine.providers().status());

    let cfg = TestConfig::default();
    let welch = engine.t_test_welch(&inlet, &outlet, &cfg)?;
    println!(
        "{}: t = {:.3}, df = {:.2}, p = {} ({})",
        welch.test,
        welch.details.statistic,
        welch.details.df,
        welch.display_p_value(4),
        if welch.significant { "significant" } else { "not significant" }
    );

    let mw = engine.mann_whitney_u(&inlet, &outlet, &cfg)?;
    println!("{}: U = {}, p = {}", mw.test, mw.details.u, mw.display_p_value(4));

    let mood = engine.mood_median_test(&inlet, &outlet, &cfg)?;
    println!("{}: chi2 = {:.3}, p = {}", mood.test, mood.details.chi2, mood.display_p_value(4));

    let greater = TestConfig::default().with_alternative(Alternative::Greater);
    let sign = engine.sign_test(&inlet, 8.0, &greater)?;
    println!(
        "{} (median > 8 mg/L): {} of {} above, p = {}",
        sign.test,
        sign.details.n_positive,
        sign.details.n,
        sign.display_p_value(4)
    );

    let tost = engine.equivalence_test(&outlet, 7.5, 8.5, &cfg)?;
    println!(
        "{} within [7.5, 8.5]: equivalent = {}, p = {}",
        tost.test,
        tost.details.equivalent,
        tost.display_p_value(4)
    );
    Ok(())
}
