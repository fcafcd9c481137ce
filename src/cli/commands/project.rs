use crate::cli::commands::{open_pool, optional_viewer, page_footer, resolve_viewer};
use crate::cli::parser::ProjectAction;
use crate::config::Config;
use crate::core::project::ProjectLogic;
use crate::core::workstream::WorkstreamLogic;
use crate::db::paging::{ListQuery, MAX_PER_PAGE};
use crate::errors::AppResult;
use crate::models::project::{NewProject, ProjectPatch};
use crate::ui::messages::{confirm, header, info, success, warning};
use crate::utils::formatting::{ellipsize, yes_no};
use crate::utils::table::Table;

pub fn handle(action: &ProjectAction, cfg: &Config, acting: Option<i64>) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let conn = &pool.conn;

    match action {
        ProjectAction::Add {
            name,
            client,
            description,
        } => {
            let viewer = optional_viewer(&pool, acting)?;
            let new = NewProject {
                name: name.clone(),
                client: client.clone(),
                description: description.clone(),
            };
            let p = ProjectLogic::create(conn, viewer.as_ref(), &new)?;
            success(format!("Project #{} added: {}", p.id, p.name));
        }

        ProjectAction::Edit {
            id,
            name,
            client,
            description,
            active,
        } => {
            let viewer = optional_viewer(&pool, acting)?;
            let patch = ProjectPatch {
                name: name.clone(),
                client: client.clone(),
                description: description.clone(),
                active: *active,
            };
            let p = ProjectLogic::update(conn, viewer.as_ref(), *id, &patch)?;
            success(format!("Project #{} updated: {}", p.id, p.name));
        }

        ProjectAction::Del { id, yes } => {
            let viewer = optional_viewer(&pool, acting)?;
            if !*yes
                && !confirm(&format!("Delete project #{id} together with its workstreams?"))
            {
                warning("Deletion cancelled.");
                return Ok(());
            }
            ProjectLogic::delete(conn, viewer.as_ref(), *id)?;
            success(format!("Project #{id} deleted."));
        }

        ProjectAction::Show { id } => {
            resolve_viewer(&pool, acting, None)?;
            let p = ProjectLogic::get(conn, *id)?;
            header(format!("Project #{} · {}", p.id, p.name), cfg.separator());
            println!("Client      : {}", p.client);
            println!("Description : {}", p.description);
            println!("Active      : {}", yes_no(p.active));
            println!("Created     : {}", p.created_at);

            let query = ListQuery {
                per_page: Some(MAX_PER_PAGE),
                ..ListQuery::default()
            };
            let ws = WorkstreamLogic::list(conn, Some(p.id), &query, cfg.default_page_size)?;
            println!();
            if ws.items.is_empty() {
                info("No workstreams yet.");
            } else {
                let mut table = Table::new(vec!["ID", "WORKSTREAM", "DESCRIPTION"]);
                for w in &ws.items {
                    table.add_row(vec![
                        w.id.to_string(),
                        w.name.clone(),
                        ellipsize(&w.description, 50),
                    ]);
                }
                print!("{}", table.render(cfg.separator()));
            }
        }

        ProjectAction::List { list } => {
            resolve_viewer(&pool, acting, None)?;
            let page = ProjectLogic::list(conn, &list.to_query(), cfg.default_page_size)?;

            if page.items.is_empty() {
                info("No projects found.");
                return Ok(());
            }

            let mut table = Table::new(vec!["ID", "NAME", "CLIENT", "DESCRIPTION", "ACTIVE"]);
            for p in &page.items {
                table.add_row(vec![
                    p.id.to_string(),
                    p.name.clone(),
                    p.client.clone(),
                    ellipsize(&p.description, 40),
                    yes_no(p.active).to_string(),
                ]);
            }
            print!("{}", table.render(cfg.separator()));
            println!("{}", page_footer(&page));
        }
    }

    Ok(())
}
