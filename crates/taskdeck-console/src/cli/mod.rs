/*
[INPUT]:  Parsed subcommand, loaded configuration, output mode
[OUTPUT]: One-shot task operations printed to stdout
[POS]:    CLI layer - non-interactive front end over the task store
[UPDATE]: When adding subcommands or changing printed output
*/

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::Subcommand;
use console::style;
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;
use serde::Serialize;
use tracing::info;

use taskdeck_adapter::{ConnectionReport, Task, TaskClient};
use taskdeck_console::form::{FormError, TaskField};
use taskdeck_console::history::ExecutionRow;
use taskdeck_console::store::describe_failure;
use taskdeck_console::{ConsoleConfig, ExecutionViewer, FormController, SubmitOutcome, TaskStore};

use crate::display::{one_line, pad};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Interactive terminal UI (default)
    Tui,
    /// List all tasks
    List,
    /// Find tasks whose name contains NAME
    Find { name: String },
    /// Create a task, or update one when --id is given
    Save {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        command: Option<String>,
    },
    /// Delete a task
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Run a task's command on the server and show its history
    Execute { id: String },
    /// Show a task's execution history
    History { id: String },
    /// Check that the task service is reachable
    Ping,
}

struct CliContext {
    client: TaskClient,
    store: TaskStore,
    json: bool,
}

pub async fn run(command: Command, config: &ConsoleConfig, json: bool) -> Result<()> {
    let client = TaskClient::with_config(config.client_config()).context("create task client")?;
    let store = TaskStore::new(Arc::new(client.clone()));
    let ctx = CliContext {
        client,
        store,
        json,
    };
    info!(base_url = %ctx.client.base_url(), ?command, "running command");

    match command {
        Command::Tui => Err(anyhow!("the tui command is handled by the binary entry point")),
        Command::List => list(&ctx).await,
        Command::Find { name } => find(&ctx, &name).await,
        Command::Save {
            id,
            name,
            owner,
            command,
        } => save(&ctx, id, name, owner, command).await,
        Command::Delete { id, yes } => delete(&ctx, &id, yes).await,
        Command::Execute { id } => execute(&ctx, &id).await,
        Command::History { id } => history(&ctx, &id).await,
        Command::Ping => ping(&ctx).await,
    }
}

async fn list(ctx: &CliContext) -> Result<()> {
    ctx.store
        .refresh()
        .await
        .map_err(|err| anyhow!(describe_failure("load tasks", &err)))?;
    print_tasks(ctx, &ctx.store.snapshot().tasks)
}

async fn find(ctx: &CliContext, name: &str) -> Result<()> {
    ctx.store
        .search(name)
        .await
        .map_err(|err| anyhow!(describe_failure("search tasks", &err)))?;
    print_tasks(ctx, &ctx.store.snapshot().tasks)
}

async fn save(
    ctx: &CliContext,
    id: Option<String>,
    name: Option<String>,
    owner: Option<String>,
    command: Option<String>,
) -> Result<()> {
    let mut form = FormController::new();
    match &id {
        Some(id) => {
            let task = ctx
                .client
                .get_task(id)
                .await
                .map_err(|err| anyhow!(describe_failure("load task", &err)))?;
            form.open_edit(&task);
        }
        None => form.open_create(),
    }

    let edits = [
        (TaskField::Name, name),
        (TaskField::Owner, owner),
        (TaskField::Command, command),
    ];
    for (field, value) in edits {
        if let Some(value) = value {
            form.set_field(field, value);
        }
    }

    match form.submit(&ctx.store).await {
        Ok(SubmitOutcome::Saved { task, message }) => {
            if ctx.json {
                print_json(&task)
            } else {
                println!("{} {}", style("✓").green(), message);
                print_tasks(ctx, std::slice::from_ref(&task))
            }
        }
        Ok(SubmitOutcome::Failed { message, .. }) => {
            for violation in form.violations() {
                eprintln!("  {}: {}", violation.field.label(), violation.message);
            }
            bail!(message)
        }
        Err(FormError::Invalid(violations)) => {
            for violation in &violations {
                eprintln!("  {}", style(&violation.message).red());
            }
            bail!("task not saved: {} invalid field(s)", violations.len())
        }
        Err(err) => Err(err.into()),
    }
}

async fn delete(ctx: &CliContext, id: &str, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete task {id}? This cannot be undone"))
            .default(false)
            .interact()
            .context("read confirmation")?;
        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }
    }

    let confirmation = ctx
        .store
        .remove(id)
        .await
        .map_err(|err| anyhow!(describe_failure("delete task", &err)))?;
    if ctx.json {
        print_json(&serde_json::json!({ "id": id, "message": confirmation }))
    } else {
        println!("{} {}", style("✓").green(), one_line(&confirmation));
        Ok(())
    }
}

async fn execute(ctx: &CliContext, id: &str) -> Result<()> {
    match ctx.store.execute(id).await {
        Ok(task) => {
            if !ctx.json {
                println!("{} Task executed successfully", style("✓").green());
            }
            print_history(ctx, &task)
        }
        Err(err) => {
            if let Some(task) = err.execution_task() {
                print_history(ctx, task)?;
            }
            Err(anyhow!(describe_failure("execute task", &err)))
        }
    }
}

async fn history(ctx: &CliContext, id: &str) -> Result<()> {
    let task = ctx
        .client
        .get_task(id)
        .await
        .map_err(|err| anyhow!(describe_failure("load task", &err)))?;
    print_history(ctx, &task)
}

async fn ping(ctx: &CliContext) -> Result<()> {
    let report = ctx.client.check_connection().await;
    if ctx.json {
        let (reachable, task_count) = match &report {
            ConnectionReport::Reachable { task_count } => (true, Some(*task_count)),
            ConnectionReport::Unreachable(_) => (false, None),
        };
        print_json(&serde_json::json!({
            "baseUrl": ctx.client.base_url().as_str(),
            "reachable": reachable,
            "taskCount": task_count,
            "message": report.summary(),
        }))?;
    } else if report.is_reachable() {
        println!("{} {}", style("✓").green(), report.summary());
    } else {
        println!("{} {}", style("✗").red(), report.summary());
    }

    if report.is_reachable() {
        Ok(())
    } else {
        bail!("task service at {} is not reachable", ctx.client.base_url())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{rendered}");
    Ok(())
}

fn print_tasks(ctx: &CliContext, tasks: &[Task]) -> Result<()> {
    if ctx.json {
        return print_json(tasks);
    }
    if tasks.is_empty() {
        println!("No tasks found");
        return Ok(());
    }

    println!(
        "{}",
        style(format!(
            "{} {} {} {} {}",
            pad("ID", 12),
            pad("NAME", 24),
            pad("OWNER", 14),
            pad("COMMAND", 32),
            "RUNS"
        ))
        .bold()
    );
    for task in tasks {
        println!(
            "{} {} {} {} {}",
            pad(&task.id, 12),
            pad(&one_line(&task.name), 24),
            pad(&one_line(&task.owner), 14),
            pad(&one_line(&task.command), 32),
            task.execution_count()
        );
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryReport<'a> {
    task: &'a Task,
    executions: Vec<HistoryLine>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryLine {
    number: usize,
    started: String,
    ended: String,
    duration: String,
    output_length: usize,
}

impl From<&ExecutionRow> for HistoryLine {
    fn from(row: &ExecutionRow) -> Self {
        Self {
            number: row.number,
            started: row.started.clone(),
            ended: row.ended.clone(),
            duration: row.duration.clone(),
            output_length: row.output_len,
        }
    }
}

fn print_history(ctx: &CliContext, task: &Task) -> Result<()> {
    let mut viewer = ExecutionViewer::new();
    viewer.open(task.clone());
    let rows = viewer.rows();
    if ctx.json {
        return print_json(&HistoryReport {
            task,
            executions: rows.iter().map(HistoryLine::from).collect(),
        });
    }

    if let Some(summary) = viewer.summary() {
        println!("{}", style(format!("Execution History: {}", summary.name)).bold());
        println!("  Task ID:          {}", summary.task_id);
        println!("  Owner:            {}", summary.owner);
        println!("  Command:          {}", one_line(&summary.command));
        println!("  Total Executions: {}", summary.total_executions);
    }
    if rows.is_empty() {
        println!("No executions yet");
        return Ok(());
    }

    for row in &rows {
        println!();
        println!(
            "{} started {}  ended {}  duration {}  ({} chars)",
            style(format!("#{}", row.number)).cyan(),
            row.started,
            row.ended,
            row.duration,
            row.output_len
        );
        for line in row.output.lines() {
            println!("    {line}");
        }
    }
    Ok(())
}
