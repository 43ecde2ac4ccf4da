use crate::cmd::Env;
use crate::output::print_json;
use anyhow::Context;
use orgpick_core::status::OrgStatusIndicator;

pub fn run(env: &Env) -> anyhow::Result<()> {
    let ctx = env.context();
    let aliases = env.aliases()?;
    let info = ctx.org_info(&aliases).context("failed to load sfdx config")?;
    let mut indicator = OrgStatusIndicator::new(ctx.notifier(), &info);

    if env.json {
        let value = serde_json::json!({
            "text": indicator.text(),
            "tooltip": OrgStatusIndicator::TOOLTIP,
            "command": OrgStatusIndicator::COMMAND,
            "org": info,
        });
        print_json(&value)?;
    } else {
        println!("{}", indicator.text());
    }

    indicator.dispose();
    Ok(())
}
