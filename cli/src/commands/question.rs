use std::io::{BufRead, Write};

use study_core::{
    category_counts, Filter, FilteredView, NewQuestion, PendingUpdates, QuestionGateway,
};

use crate::{
    app_config::AppConfig,
    args::{QuestionCommand, QuestionListArgs},
    client::ApiClient,
    formatters::{print_mastery_stats, QuestionListFormatter},
};

pub fn question_cmd(config: &AppConfig, subcommand: QuestionCommand) -> Result<(), anyhow::Error> {
    let client = ApiClient::new(&config.server_url)?;

    match subcommand {
        QuestionCommand::List(args) => {
            let view = build_view(&client, config, &args)?;

            let mut formatter = QuestionListFormatter::new(args.output);
            formatter
                .print_page(&view)
                .map_err(|e| anyhow::anyhow!("Error while formatting questions: {}", e))?;
        }
        QuestionCommand::Add(args) => {
            let question = NewQuestion::new(&args.content, &args.answer, &args.category);
            question.validate()?;
            client.create(&question)?;

            println!("Question added ({})", question.category);
        }
        QuestionCommand::Update(args) => {
            let question = NewQuestion::new(
                &args.fields.content,
                &args.fields.answer,
                &args.fields.category,
            );
            question.validate()?;
            client.update(args.id, &question)?;

            println!("Question {} updated", args.id);
        }
        QuestionCommand::Delete(args) => {
            if !args.yes && !confirm(args.ids.len())? {
                println!("Aborted");
                return Ok(());
            }

            // Per-operation errors are surfaced inline; the rest of the
            // batch still runs
            let mut deleted = 0;
            for id in &args.ids {
                match client.delete(*id) {
                    Ok(()) => {
                        deleted += 1;
                        println!("Question {} deleted", id);
                    }
                    Err(err) => eprintln!("Question {}: {}", id, err),
                }
            }
            println!("Deleted {} of {} question(s)", deleted, args.ids.len());
        }
        QuestionCommand::Mastery(args) => {
            let mut view = FilteredView::new(config.page_size);
            view.set_source_collection(client.list_all()?);

            let mut pending = PendingUpdates::new();
            let level = pending.advance(&mut view, &client, args.id)?;

            println!("Question {} is now {}", args.id, level);
        }
        QuestionCommand::Categories => {
            let categories = client.list_categories()?;
            let counts = category_counts(&client.list_all()?);

            for category in categories {
                let count = counts.get(&category).copied().unwrap_or(0);
                println!("{} ({})", category, count);
            }
        }
        QuestionCommand::Stats => {
            let stats = client.mastery_stats()?;
            print_mastery_stats(&stats)?;
        }
    };

    Ok(())
}

fn build_view(
    client: &ApiClient,
    config: &AppConfig,
    args: &QuestionListArgs,
) -> Result<FilteredView<study_core::QuestionItem>, anyhow::Error> {
    let items = client.list_all()?;

    let mut view = FilteredView::new(args.page_size.unwrap_or(config.page_size));
    view.set_source_collection(items);

    if let Some(category) = &args.category {
        view.set_filter(Filter::Facet(Some(category.clone())));
    }
    if let Some(search) = &args.search {
        view.set_filter(Filter::Search(search.clone()));
    }
    view.go_to_page(args.page);

    Ok(view)
}

fn confirm(count: usize) -> Result<bool, anyhow::Error> {
    print!("Delete {} question(s)? [y/N] ", count);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
