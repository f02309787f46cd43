//! Task command handlers for the organizer CLI
//!
//! Outcomes of mutations are reported by the synchronizer's notifications;
//! handlers only print the resulting records.

use organizer_client::models::{
    CreateTaskRequest, Task, TaskReflection, TaskStatus, TaskType, UpdateTaskRequest,
};
use organizer_client::{ClientConfig, ClientResult, TaskFilters};

use crate::cli::{authenticated_client, parse_arg, print_json};
use crate::TaskCommands;

pub async fn handle_task_command(
    cmd: TaskCommands,
    config: &ClientConfig,
    json: bool,
) -> ClientResult<()> {
    let client = authenticated_client(config).await?;
    let tasks = client.tasks();

    match cmd {
        TaskCommands::List {
            status,
            project,
            scheduled_for,
            tags,
        } => {
            let filters = TaskFilters {
                status: parse_arg::<TaskStatus>(status, "status")?,
                project_id: project,
                scheduled_for,
                tags,
            };
            let items = tasks.fetch_all(&filters).await?;
            print_tasks(&items, json)?;
        }
        TaskCommands::Today => {
            let items = tasks.fetch_today().await?;
            print_tasks(&items, json)?;
        }
        TaskCommands::Actionable => {
            let items = tasks.fetch_actionable().await?;
            print_tasks(&items, json)?;
        }
        TaskCommands::Get { id } => {
            let task = tasks.get(&id).await?;
            print_task(&task, json)?;
        }
        TaskCommands::Create {
            title,
            description,
            project,
            task_type,
            scheduled_for,
            estimate,
            context,
            energy,
            tags,
        } => {
            let request = CreateTaskRequest {
                title,
                description,
                project_id: project,
                task_type: parse_arg::<TaskType>(task_type, "task type")?,
                scheduled_for,
                estimated_pomodoros: estimate,
                context,
                energy_level: energy,
                tags: (!tags.is_empty()).then_some(tags),
            };
            let task = tasks.create(&request).await?;
            print_task(&task, json)?;
        }
        TaskCommands::Update {
            id,
            title,
            description,
            status,
            project,
            scheduled_for,
            actual,
        } => {
            let request = UpdateTaskRequest {
                title,
                description,
                status: parse_arg::<TaskStatus>(status, "status")?,
                project_id: project,
                scheduled_for,
                actual_pomodoros: actual,
                ..Default::default()
            };
            let task = tasks.update(&id, &request).await?;
            print_task(&task, json)?;
        }
        TaskCommands::Complete { id } => {
            let task = tasks.complete(&id).await?;
            print_task(&task, json)?;
        }
        TaskCommands::Reorder { id, order } => {
            let task = tasks.reorder(&id, order).await?;
            print_task(&task, json)?;
        }
        TaskCommands::Note { id, content } => {
            let task = tasks.add_note(&id, &content).await?;
            print_task(&task, json)?;
        }
        TaskCommands::Reflect {
            id,
            difficulty,
            satisfaction,
            notes,
            lessons,
        } => {
            let reflection = TaskReflection {
                difficulty,
                satisfaction,
                notes,
                lessons_learned: lessons,
            };
            let task = tasks.update_reflection(&id, &reflection).await?;
            print_task(&task, json)?;
        }
        TaskCommands::Delete { id } => {
            tasks.remove(&id).await?;
        }
    }

    Ok(())
}

fn print_tasks(tasks: &[Task], json: bool) -> ClientResult<()> {
    if json {
        return print_json(tasks);
    }

    if tasks.is_empty() {
        println!("No tasks found");
        return Ok(());
    }

    println!("{} task(s):", tasks.len());
    for task in tasks {
        let scheduled = task.scheduled_for.as_deref().unwrap_or("-");
        println!(
            "  {:<12} {:<36} {:<10} {}",
            task.status.to_string(),
            task.id,
            scheduled,
            task.title
        );
    }
    Ok(())
}

fn print_task(task: &Task, json: bool) -> ClientResult<()> {
    if json {
        return print_json(task);
    }

    println!("  ID: {}", task.id);
    println!("  Title: {}", task.title);
    println!("  Status: {}", task.status);
    println!("  Type: {}", task.task_type);
    if let Some(project_id) = &task.project_id {
        println!("  Project: {}", project_id);
    }
    if let Some(description) = &task.description {
        println!("  Description: {}", description);
    }
    if let Some(scheduled) = &task.scheduled_for {
        println!("  Scheduled for: {}", scheduled);
    }
    if let Some(estimate) = task.estimated_pomodoros {
        println!(
            "  Pomodoros: {}/{}",
            task.actual_pomodoros.unwrap_or(0),
            estimate
        );
    }
    println!("  Order: {}", task.user_defined_order);
    if !task.tags.is_empty() {
        println!("  Tags: {}", task.tags.join(", "));
    }
    println!("  Created: {}", task.created_at);
    println!("  Updated: {}", task.updated_at);
    if let Some(completed) = task.completed_at {
        println!("  Completed: {}", completed);
    }
    for note in &task.notes {
        println!("  Note: {}", note.content);
    }
    if let Some(reflection) = &task.reflection {
        println!(
            "  Reflection: difficulty {}/5, satisfaction {}/5",
            reflection.difficulty, reflection.satisfaction
        );
    }
    Ok(())
}
