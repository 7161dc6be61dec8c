use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use roster_core::{
    aggregate::{completion_ratios, StatsViewState},
    color::coordinator_category,
    events::RosterEvent,
    mutation::FieldMutationCoordinator,
    query::{QueryParameters, RosterPage, RosterQueryController, RosterViewState},
    view::ViewRouter,
};
use shared::{
    domain::{CompanyId, PageSize, SortField, SortOrder, StatusFlag},
    protocol::NewCompany,
};
use std::sync::Arc;
use std::time::Duration;

mod config;

#[derive(Parser, Debug)]
#[command(about = "Command-line roster client for the company tracking store")]
struct Args {
    /// Remote store base URL; overrides roster.toml and ROSTER_API_URL.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print one roster page.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Rows per page: 50, 100, 150 or 300.
        #[arg(long, default_value_t = 50)]
        per_page: u32,
        /// Column to sort by: name, cgpa, stipend, arrival-date, type, coordinator.
        #[arg(long)]
        sort: Option<SortField>,
        #[arg(long)]
        descending: bool,
        /// Substring filter on the company name.
        #[arg(long)]
        search: Option<String>,
    },
    /// Assign a coordinator to a company. An empty name unassigns.
    Assign {
        id: String,
        #[arg(default_value = "")]
        coordinator: String,
    },
    /// Flip one status flag: tracked, invited or called.
    Toggle {
        id: String,
        flag: StatusFlag,
        /// The flag's value as currently displayed; the store receives its
        /// negation.
        #[arg(long)]
        current: bool,
    },
    /// Create a new company record.
    Add {
        name: String,
        #[arg(long)]
        job_title: Option<String>,
        #[arg(long)]
        cgpa: Option<f64>,
        #[arg(long)]
        stipend: Option<f64>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        arrival_date: Option<String>,
        #[arg(long, value_name = "TYPE")]
        company_type: Option<String>,
    },
    /// Print per-coordinator completion stats.
    Stats {
        /// Also print the companies assigned to this coordinator.
        #[arg(long)]
        coordinator: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let api_url = match args.api_url {
        Some(url) => url,
        None => config::load_settings().api_url,
    };
    let api_url = config::normalize_api_url(&api_url)?;
    tracing::debug!(%api_url, "resolved remote store url");

    match args.command {
        Command::List {
            page,
            per_page,
            sort,
            descending,
            search,
        } => {
            let order = if descending {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            let params = QueryParameters {
                page,
                page_size: PageSize::try_from(per_page)?,
                sort: sort.map(|field| (field, order)),
                search,
            };
            let roster = RosterQueryController::with_params(&api_url, params);
            let loaded = fetch_page(&roster).await?;
            print_page(&roster, &loaded).await;
        }
        Command::Assign { id, coordinator } => {
            let roster = RosterQueryController::new(&api_url);
            let writer = FieldMutationCoordinator::new(&api_url, roster);
            let id = CompanyId(id);
            writer.set_coordinator(&id, &coordinator).await?;
            if coordinator.is_empty() {
                println!("Unassigned coordinator of {id}");
            } else {
                println!("Assigned {coordinator} to {id}");
            }
        }
        Command::Toggle { id, flag, current } => {
            let roster = RosterQueryController::new(&api_url);
            let writer = FieldMutationCoordinator::new(&api_url, roster);
            let id = CompanyId(id);
            writer.toggle_flag(&id, flag, current).await?;
            println!("{id}: {flag} is now {}", !current);
        }
        Command::Add {
            name,
            job_title,
            cgpa,
            stipend,
            location,
            arrival_date,
            company_type,
        } => {
            let roster = RosterQueryController::new(&api_url);
            let writer = FieldMutationCoordinator::new(&api_url, roster);
            writer
                .add_company(&NewCompany {
                    name: name.clone(),
                    job_title,
                    cgpa,
                    stipend,
                    location,
                    arrival_date,
                    company_type,
                    ..NewCompany::default()
                })
                .await?;
            println!("Created {name}");
        }
        Command::Stats { coordinator } => {
            let router = ViewRouter::new(&api_url);
            let stats = router.show_performance().await;
            let snapshot = match stats.snapshot().await {
                StatsViewState::Loaded(snapshot) => snapshot,
                StatsViewState::Failed(message) => bail!("stats fetch failed: {message}"),
                StatsViewState::Loading => bail!("stats fetch did not complete"),
            };
            for stat in &snapshot {
                let ratios = completion_ratios(stat);
                let category = coordinator_category(&stat.coordinator).unwrap_or(0);
                println!(
                    "[{category}] {}: {} companies, tracked {:.0}%, invited {:.0}%, called {:.0}%",
                    stat.coordinator,
                    stat.total,
                    ratios.tracked * 100.0,
                    ratios.invited * 100.0,
                    ratios.called * 100.0,
                );
            }
            if let Some(name) = coordinator {
                stats.select(&name).await;
                let Some(stat) = stats.selected_stat().await else {
                    bail!("no stats for coordinator '{name}'");
                };
                for company in &stat.companies {
                    println!(
                        "  {} [{}{}{}]",
                        company.name,
                        if company.tracked { 'T' } else { '-' },
                        if company.invited { 'I' } else { '-' },
                        if company.called { 'C' } else { '-' },
                    );
                }
            }
        }
    }

    Ok(())
}

/// Drives the initial fetch and waits for it to settle either way.
async fn fetch_page(roster: &Arc<RosterQueryController>) -> Result<RosterPage> {
    let mut events = roster.subscribe_events();
    roster.refresh().await?;
    let settled = tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            match events.recv().await {
                Ok(RosterEvent::RosterLoaded { .. }) | Ok(RosterEvent::RosterFailed(_)) => break,
                Ok(_) => {}
                Err(err) => bail!("event stream closed: {err}"),
            }
        }
        Ok(())
    })
    .await;
    match settled {
        Ok(result) => result?,
        Err(_) => bail!("timed out waiting for the roster page"),
    }
    match roster.snapshot().await {
        RosterViewState::Loaded(page) => Ok(page),
        RosterViewState::Failed(message) => bail!("roster fetch failed: {message}"),
        RosterViewState::Loading => bail!("roster fetch did not complete"),
    }
}

async fn print_page(roster: &Arc<RosterQueryController>, page: &RosterPage) {
    for company in &page.companies {
        let coordinator = match company.coordinator() {
            Some(name) => {
                let category = coordinator_category(name).unwrap_or(0);
                format!("{name} [{category}]")
            }
            None => "unassigned".to_string(),
        };
        let stipend = company
            .stipend
            .map(format_stipend)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {}  {}  {}  [{}{}{}]",
            company.id,
            company.name,
            stipend,
            coordinator,
            if company.tracked { 'T' } else { '-' },
            if company.invited { 'I' } else { '-' },
            if company.called { 'C' } else { '-' },
        );
    }
    let params = roster.params().await;
    println!(
        "page {}/{} ({} companies total)",
        params.page,
        roster.total_pages().await,
        page.total,
    );
}

/// Whole-rupee display with thousands separators.
fn format_stipend(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (index, ch) in digits.chars().enumerate() {
        let remaining = digits.len() - index;
        if index > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if whole < 0 { "-" } else { "" };
    format!("₹{sign}{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stipend_groups_thousands() {
        assert_eq!(format_stipend(25000.0), "₹25,000");
        assert_eq!(format_stipend(1234567.0), "₹1,234,567");
        assert_eq!(format_stipend(999.4), "₹999");
    }

    #[test]
    fn stipend_handles_small_and_zero() {
        assert_eq!(format_stipend(0.0), "₹0");
        assert_eq!(format_stipend(42.0), "₹42");
    }
}
