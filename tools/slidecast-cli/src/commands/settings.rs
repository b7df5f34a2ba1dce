//! Saved conversion parameters.

use slidecast_project_model::params::{ParameterOverrides, ParameterSet};

use crate::Context;

pub fn show(ctx: &Context) -> anyhow::Result<()> {
    let params = ctx.settings.load()?;
    println!("Settings: {}", ctx.settings.path().display());
    print_params(&params);
    Ok(())
}

pub fn set(ctx: &Context, overrides: ParameterOverrides) -> anyhow::Result<()> {
    let params = ctx.settings.load_or_default().with_overrides(&overrides);
    ctx.settings.save(&params)?;
    println!("Settings saved: {}", ctx.settings.path().display());
    print_params(&params);
    Ok(())
}

pub fn reset(ctx: &Context) -> anyhow::Result<()> {
    let params = ParameterSet::default();
    ctx.settings.save(&params)?;
    println!("Settings reset: {}", ctx.settings.path().display());
    print_params(&params);
    Ok(())
}

fn print_params(params: &ParameterSet) {
    println!("  Slide duration: {}s", params.slide_duration_secs);
    println!("  Transition: {}", params.transition);
    println!("  Transition duration: {}s", params.transition_duration_secs);
    println!("  Quality: {}", params.quality);
    println!("  Resolution: {}", params.resolution);
    println!("  Music volume: {}", params.bgm_volume);
    println!("  Save text: {}", params.save_text);
    println!("  Auto next: {}", params.auto_next);
}
