use crate::cli::api_client::ApiClient;
use crate::cli::args::{AddProjectArgs, ProjectNameArgs, UpdateProjectArgs};
use crate::contracts::project::ProjectResource;

/// Read-modify-replace: only the fields given on the command line change.
pub fn apply_update(project: &mut ProjectResource, args: &UpdateProjectArgs) {
    if let Some(name) = &args.rename_to {
        project.name = name.clone();
    }
    if let Some(description) = &args.description {
        project.description = description.clone();
    }
    if let Some(billable) = args.billable {
        project.billable = billable;
    }
}

pub async fn add_project(client: &mut ApiClient, args: AddProjectArgs) -> anyhow::Result<()> {
    let project = ProjectResource {
        name: args.name,
        description: args.description,
        billable: args.billable,
    };
    println!("{}", client.create_project(&project).await?);
    Ok(())
}

pub async fn get_project(client: &mut ApiClient, args: ProjectNameArgs) -> anyhow::Result<()> {
    println!("{}", client.get_project(&args.name).await?);
    Ok(())
}

pub async fn update_project(client: &mut ApiClient, args: UpdateProjectArgs) -> anyhow::Result<()> {
    let mut project = client.get_project(&args.name).await?;
    apply_update(&mut project, &args);
    println!("{}", client.update_project(&args.name, &project).await?);
    Ok(())
}

pub async fn list_projects(client: &mut ApiClient) -> anyhow::Result<()> {
    for project in client.list_projects().await? {
        println!("{project}");
    }
    Ok(())
}
