use study_core::{CodingProblem, Error, Filter, FilteredView, ProblemGateway};

use crate::{
    app_config::AppConfig,
    args::ProblemCommand,
    client::ApiClient,
    formatters::{print_problem, print_problem_stats, ProblemListFormatter},
};

pub fn problem_cmd(config: &AppConfig, subcommand: ProblemCommand) -> Result<(), anyhow::Error> {
    let client = ApiClient::new(&config.server_url)?;

    match subcommand {
        ProblemCommand::List(args) => {
            let problems = client.list_all()?;

            let mut view = FilteredView::new(args.page_size.unwrap_or(config.page_size));
            view.set_source_collection(problems.clone());

            if args.daily {
                view.set_scope(Some(daily_scope(&client)?));
            }

            if let Some(difficulty) = args.difficulty {
                view.set_filter(Filter::Facet(Some(difficulty.bucket().to_string())));
            }
            if let Some(source) = args.source {
                view.set_filter(Filter::Source(Some(source)));
            }
            if let Some(search) = args.search {
                view.set_filter(Filter::Search(search));
            }
            view.go_to_page(args.page);

            let mut formatter = ProblemListFormatter::new(args.output);
            formatter
                .print_page(&view)
                .map_err(|e| anyhow::anyhow!("Error while formatting problems: {}", e))?;
            formatter.print_sources(&problems)?;
        }
        ProblemCommand::Daily => {
            // Retried with backoff inside the client before surfacing
            let problem = client.daily()?;
            print_problem(&problem)?;
        }
        ProblemCommand::Random => {
            let problem = client.random()?;
            print_problem(&problem)?;
        }
        ProblemCommand::Stats => {
            let stats = client.stats()?;
            print_problem_stats(&stats)?;
        }
        ProblemCommand::Status(args) => {
            client.update_study_status(args.id, args.status)?;
            println!("Problem {} marked {}", args.id, args.status);
        }
        ProblemCommand::Open(args) => {
            let problems = client.list_all()?;
            let problem = problems
                .iter()
                .find(|p| p.id == args.id)
                .ok_or_else(|| Error::NotFound(format!("problem {}", args.id)))?;

            webbrowser::open(&problem.source_url)?;
            println!("Opened {}", problem.source_url);
        }
    };

    Ok(())
}

/// Working set for the daily tab: the pick history, or today's pick alone
/// when no history has accumulated yet. A failed daily fetch is surfaced
/// instead of collapsing into an empty page.
fn daily_scope(gateway: &dyn ProblemGateway) -> study_core::Result<Vec<CodingProblem>> {
    let history = gateway.daily_history()?;
    if history.is_empty() {
        Ok(vec![gateway.daily()?])
    } else {
        Ok(history)
    }
}
