//! Project command handlers for the organizer CLI

use organizer_client::models::{
    CanvasPosition, CreateProjectRequest, Project, ProjectPriority, ProjectStatus,
    UpdateProjectRequest,
};
use organizer_client::{ClientConfig, ClientResult};

use crate::cli::{authenticated_client, parse_arg, print_json};
use crate::ProjectCommands;

pub async fn handle_project_command(
    cmd: ProjectCommands,
    config: &ClientConfig,
    json: bool,
) -> ClientResult<()> {
    let client = authenticated_client(config).await?;
    let projects = client.projects();

    match cmd {
        ProjectCommands::List => {
            let items = projects.fetch_all(&()).await?;
            if json {
                return print_json(&items);
            }
            if items.is_empty() {
                println!("No projects found");
            } else {
                println!("{} project(s):", items.len());
                for project in &items {
                    println!(
                        "  {:<10} {:<9} {:<36} {}",
                        project.status.to_string(),
                        project.priority.to_string(),
                        project.id,
                        project.title
                    );
                }
            }
        }
        ProjectCommands::Get { id } => {
            let project = projects.get(&id).await?;
            print_project(&project, json)?;
        }
        ProjectCommands::Create {
            title,
            description,
            priority,
            tags,
        } => {
            let request = CreateProjectRequest {
                title,
                description,
                priority: parse_arg::<ProjectPriority>(priority, "priority")?,
                tags: (!tags.is_empty()).then_some(tags),
                ..Default::default()
            };
            let project = projects.create(&request).await?;
            print_project(&project, json)?;
        }
        ProjectCommands::Update {
            id,
            title,
            description,
            status,
            priority,
        } => {
            let request = UpdateProjectRequest {
                title,
                description,
                status: parse_arg::<ProjectStatus>(status, "status")?,
                priority: parse_arg::<ProjectPriority>(priority, "priority")?,
                ..Default::default()
            };
            let project = projects.update(&id, &request).await?;
            print_project(&project, json)?;
        }
        ProjectCommands::Position { id, x, y } => {
            let project = projects
                .update_position(&id, CanvasPosition { x, y })
                .await?;
            print_project(&project, json)?;
        }
        ProjectCommands::Stats { id } => {
            let (project, statistics) =
                futures::future::try_join(projects.get(&id), projects.statistics(&id)).await?;
            if json {
                return print_json(&statistics);
            }
            println!("Statistics for {}:", project.title);
            match statistics.as_object() {
                Some(fields) => {
                    for (key, value) in fields {
                        println!("  {}: {}", key, value);
                    }
                }
                None => println!("  {}", statistics),
            }
        }
        ProjectCommands::Delete { id } => {
            projects.remove(&id).await?;
        }
    }

    Ok(())
}

fn print_project(project: &Project, json: bool) -> ClientResult<()> {
    if json {
        return print_json(project);
    }

    println!("  ID: {}", project.id);
    println!("  Title: {}", project.title);
    println!("  Status: {}", project.status);
    println!("  Priority: {}", project.priority);
    if let Some(description) = &project.description {
        println!("  Description: {}", description);
    }
    if let Some(deadline) = project.deadline {
        println!("  Deadline: {}", deadline);
    }
    println!(
        "  Canvas position: ({}, {})",
        project.canvas_position.x, project.canvas_position.y
    );
    println!("  Tasks: {}", project.task_ids.len());
    if !project.tags.is_empty() {
        println!("  Tags: {}", project.tags.join(", "));
    }
    println!("  Created: {}", project.created_at);
    println!("  Updated: {}", project.updated_at);
    Ok(())
}
