//! Handlers for the bet commands: `list`, `create`, `stake`, `end-epoch`.

use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::ProgressBar;
use serde_json::{json, Value};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::command::{CreateArgs, EndEpochArgs, StakeArgs};
use super::output;
use super::progress::ProgressNotifier;
use crate::application::{ActionOutcome, FlowState, WagerService};
use crate::domain::{Bet, BetId, BetLifecycle, CreateRequest, Side};
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

#[derive(Tabled)]
struct BetRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Threshold")]
    threshold: String,
    #[tabled(rename = "Exceed")]
    exceed: String,
    #[tabled(rename = "Not exceed")]
    not_exceed: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn bet_json(bet: &Bet, threshold_decimals: u32) -> Value {
    json!({
        "id": bet.id().value(),
        "title": bet.title(),
        "threshold": bet.threshold().format_units(threshold_decimals),
        "pool_exceed": bet.pool_exceed().format_native(),
        "pool_not_exceed": bet.pool_not_exceed().format_native(),
        "total_pool": bet.total_pool().format_native(),
        "status": bet.status(),
    })
}

fn bet_row(bet: &Bet, threshold_decimals: u32) -> BetRow {
    BetRow {
        id: bet.id().value(),
        title: bet.title().to_string(),
        threshold: bet.threshold().format_units(threshold_decimals),
        exceed: bet.pool_exceed().format_native(),
        not_exceed: bet.pool_not_exceed().format_native(),
        status: output::status(bet.is_open(), bet.status()),
    }
}

fn print_bet(bet: &Bet, threshold_decimals: u32) {
    output::field("Bet", format!("#{} {}", bet.id(), bet.title()));
    output::field("Threshold", bet.threshold().format_units(threshold_decimals));
    output::field("Exceed pool", bet.pool_exceed().format_native());
    output::field("Not-exceed pool", bet.pool_not_exceed().format_native());
    output::field("Status", output::status(bet.is_open(), bet.status()));
}

/// Ask before moving funds unless `--yes` or JSON mode.
fn confirm(prompt: &str, skip: bool) -> Result<bool> {
    if skip || output::is_json() {
        return Ok(true);
    }
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    if !confirmed {
        output::warning("Cancelled, nothing was submitted");
    }
    Ok(confirmed)
}

/// Service whose notifications drive `pb`, which stays hidden until started.
fn connect(config: &Config) -> Result<(WagerService, ProgressBar)> {
    let pb = ProgressBar::hidden();
    let service =
        bootstrap::build_service(config, vec![Box::new(ProgressNotifier::new(pb.clone()))])?;
    Ok((service, pb))
}

/// Which bet in the refreshed snapshot an action is about.
#[derive(Clone, Copy)]
enum Target<'a> {
    Existing(BetId),
    /// Ids are assigned by the ledger, so a new bet is found by its content.
    /// Among identical bets the newest is shown.
    Created(&'a CreateRequest),
}

fn pick_bet<'b>(bets: &'b [Bet], target: Target<'_>) -> Option<&'b Bet> {
    match target {
        Target::Existing(id) => bets.iter().find(|bet| bet.id() == id),
        Target::Created(request) => bets
            .iter()
            .filter(|bet| bet.title() == request.title && bet.threshold() == request.threshold)
            .max_by_key(|bet| bet.id()),
    }
}

fn settle(
    service: &WagerService,
    pb: &ProgressBar,
    label: &str,
    result: Result<ActionOutcome>,
    threshold_decimals: u32,
    target: Target<'_>,
) -> Result<()> {
    match result {
        Ok(outcome) => report(service, pb, &outcome, threshold_decimals, target),
        Err(e) => {
            output::spinner_fail(pb, label);
            Err(e)
        }
    }
}

fn report(
    service: &WagerService,
    pb: &ProgressBar,
    outcome: &ActionOutcome,
    threshold_decimals: u32,
    target: Target<'_>,
) -> Result<()> {
    let flow = &outcome.flow;
    let reference = flow.reference().map(ToString::to_string).unwrap_or_default();
    let explorer = flow
        .reference()
        .and_then(|reference| service.tracker().explorer_url(reference));
    let bet = outcome
        .bets
        .as_deref()
        .and_then(|bets| pick_bet(bets, target));

    match flow.state() {
        FlowState::Confirmed(receipt) => {
            if output::is_json() {
                output::json_output(json!({
                    "status": flow.status(),
                    "operation": flow.operation(),
                    "reference": reference,
                    "block_number": receipt.block_number,
                    "explorer_url": explorer,
                    "bet": bet.map(|bet| bet_json(bet, threshold_decimals)),
                }));
                pb.finish_and_clear();
                return Ok(());
            }
            output::spinner_success(pb, "Transaction Successful");
            output::field("Operation", flow.operation());
            output::field("Transaction", output::highlight(&reference));
            if let Some(block) = receipt.block_number {
                output::field("Block", block);
            }
            if let Some(url) = explorer {
                output::field("Explorer", url);
            }
            if let Some(bet) = bet {
                output::section("Bet");
                print_bet(bet, threshold_decimals);
            } else {
                output::hint("run `wagerline list` to see the updated bets");
            }
            Ok(())
        }
        FlowState::Failed(failure) => {
            if output::is_json() {
                output::json_output(json!({
                    "status": flow.status(),
                    "operation": flow.operation(),
                    "reference": reference,
                    "reason": failure.to_string(),
                }));
                pb.finish_and_clear();
            } else {
                output::spinner_fail(pb, "Transaction Failed");
                output::field("Transaction", &reference);
            }
            Err(Error::Confirmation(failure.clone()))
        }
        FlowState::Idle | FlowState::Pending { .. } => Err(Error::Cancelled),
    }
}

/// Execute `list`.
pub async fn execute_list(config: &Config) -> Result<()> {
    let service = bootstrap::build_service(config, Vec::new())?;
    let decimals = service.lifecycle().policy().threshold_decimals;

    let pb = output::spinner("Fetching bets");
    let bets = match service.list_bets().await {
        Ok(bets) => {
            pb.finish_and_clear();
            bets
        }
        Err(e) => {
            output::spinner_fail(&pb, "Fetching bets");
            return Err(e);
        }
    };

    if output::is_json() {
        let bets: Vec<Value> = bets.iter().map(|bet| bet_json(bet, decimals)).collect();
        output::json_output(json!({ "command": "list", "bets": bets }));
        return Ok(());
    }

    output::section(&format!("Bets ({})", bets.len()));
    if bets.is_empty() {
        output::note("No bets yet.");
        output::hint(&format!(
            "create one with {}",
            output::highlight("wagerline create --title \"ETH > 5000\" --threshold 5000")
        ));
        return Ok(());
    }

    let rows: Vec<BetRow> = bets.iter().map(|bet| bet_row(bet, decimals)).collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    output::lines(&table);
    Ok(())
}

/// Execute `create`.
pub async fn execute_create(config: &Config, args: &CreateArgs) -> Result<()> {
    let (service, pb) = connect(config)?;
    let decimals = service.lifecycle().policy().threshold_decimals;

    let request = service.lifecycle().validate_create(&args.title, &args.threshold)?;

    output::start_spinner(&pb, "Creating bet");
    let result = service.create_bet(&args.title, &args.threshold).await;
    settle(&service, &pb, "Creating bet", result, decimals, Target::Created(&request))
}

/// Execute `stake`.
pub async fn execute_stake(config: &Config, args: &StakeArgs, skip_confirm: bool) -> Result<()> {
    let (service, pb) = connect(config)?;
    let decimals = service.lifecycle().policy().threshold_decimals;
    let side = Side::from(args.side);

    let bet = service.find_bet(args.bet_id()).await?;
    // Stale bets and malformed amounts fail before the prompt.
    let request = service.lifecycle().validate_stake(&bet, side, &args.amount)?;

    output::section("Stake");
    print_bet(&bet, decimals);
    output::field("Side", output::highlight(side));
    output::field("Amount", request.amount.format_native());
    let prompt = format!("Stake {} on {side}?", request.amount.format_native());
    if !confirm(&prompt, skip_confirm)? {
        return Ok(());
    }

    output::start_spinner(&pb, "Placing stake");
    let result = service.place_stake(&bet, side, &args.amount).await;
    settle(&service, &pb, "Placing stake", result, decimals, Target::Existing(bet.id()))
}

/// Execute `end-epoch`.
pub async fn execute_end_epoch(
    config: &Config,
    args: &EndEpochArgs,
    skip_confirm: bool,
) -> Result<()> {
    let (service, pb) = connect(config)?;
    let decimals = service.lifecycle().policy().threshold_decimals;
    let fee = service.lifecycle().policy().protocol_fee;

    let bet = service.find_bet(BetId::new(args.bet_id)).await?;
    BetLifecycle::ensure_open(&bet)?;

    output::section("End Epoch");
    print_bet(&bet, decimals);
    output::field("Protocol fee", fee.format_native());
    let prompt = format!(
        "End the epoch for bet {}, paying {}?",
        bet.id(),
        fee.format_native()
    );
    if !confirm(&prompt, skip_confirm)? {
        return Ok(());
    }

    output::start_spinner(&pb, "Ending epoch");
    let result = service.end_epoch(&bet).await;
    settle(&service, &pb, "Ending epoch", result, decimals, Target::Existing(bet.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Amount;

    fn bet(id: u64, title: &str, threshold: u128) -> Bet {
        Bet::new(
            BetId::new(id),
            title,
            Amount::from_units(threshold),
            Amount::ZERO,
            Amount::ZERO,
            false,
        )
    }

    #[test]
    fn created_bet_is_found_by_content_not_by_newest_id() {
        let request = BetLifecycle::default()
            .validate_create("ETH > 5000", "5000")
            .unwrap();
        // Bet 2 was created concurrently by someone else.
        let bets = vec![
            bet(0, "BTC > 100000", 100_000),
            bet(1, "ETH > 5000", 5000),
            bet(2, "ETH > 6000", 6000),
        ];

        let shown = pick_bet(&bets, Target::Created(&request)).unwrap();
        assert_eq!(shown.id(), BetId::new(1));
    }

    #[test]
    fn existing_bet_is_found_by_id() {
        let bets = vec![bet(0, "ETH > 5000", 5000), bet(1, "ETH > 5000", 5000)];
        assert_eq!(
            pick_bet(&bets, Target::Existing(BetId::new(0))).map(Bet::id),
            Some(BetId::new(0))
        );
        assert!(pick_bet(&bets, Target::Existing(BetId::new(7))).is_none());
    }
}
