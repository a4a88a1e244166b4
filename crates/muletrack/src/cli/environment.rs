use super::commands::OutputFormat;
use super::utils::{print_json, rule, success, CYAN, GREEN, GREY, RESET, YELLOW};
use anyhow::{bail, Context, Result};
use muletrack::platform::{Environment, OrganizationClient};
use muletrack::{MuletrackConfig, PlatformHttpClient, SessionStore};
use std::io::{BufRead, Write};

pub async fn run_environment(
    config: &MuletrackConfig,
    store: &SessionStore,
    org: &str,
    select: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let mut session = store.require_usable()?;
    let http = PlatformHttpClient::new(session.control_plane, &config.http)?;
    let orgs = OrganizationClient::new(http, session.token());

    let group = orgs
        .business_group(org)
        .await
        .with_context(|| format!("Failed to fetch organization {}", org))?;

    if group.environments.is_empty() {
        bail!("Organization {} has no environments", org);
    }

    let index = match (select, format) {
        (Some(n), _) => n,
        (None, OutputFormat::Json) => {
            return print_json(&group.environments);
        }
        (None, OutputFormat::Text) => {
            print_environments(&group.name, &group.environments);
            prompt_choice(group.environments.len())?
        }
    };

    let Some(env) = index.checked_sub(1).and_then(|i| group.environments.get(i)) else {
        bail!(
            "Environment {} out of range (1-{})",
            index,
            group.environments.len()
        );
    };

    session.select_org(&group.id);
    session.select_env(&env.id);
    store.save(&session)?;

    match format {
        OutputFormat::Json => print_json(env)?,
        OutputFormat::Text => success(format!(
            "Selected {}{}{} in {}{}{}",
            CYAN, env.name, RESET, CYAN, group.name, RESET
        )),
    }
    Ok(())
}

fn print_environments(org_name: &str, environments: &[Environment]) {
    println!("{}Environments of {}{}", GREEN, org_name, RESET);
    rule(60);
    for (i, env) in environments.iter().enumerate() {
        let production = if env.is_production {
            format!("{}production{}", YELLOW, RESET)
        } else {
            String::new()
        };
        println!(
            "{:>3}. {:<24} {}{:<38}{} {}",
            i + 1,
            env.name,
            GREY,
            env.id,
            RESET,
            production
        );
    }
    rule(60);
}

fn prompt_choice(count: usize) -> Result<usize> {
    print!("Select environment (1-{}): ", count);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    line.trim()
        .parse()
        .with_context(|| format!("'{}' is not a number", line.trim()))
}
