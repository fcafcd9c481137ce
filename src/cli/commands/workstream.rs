use crate::cli::commands::{open_pool, optional_viewer, page_footer, resolve_viewer};
use crate::cli::parser::WorkstreamAction;
use crate::config::Config;
use crate::core::workstream::WorkstreamLogic;
use crate::db::projects;
use crate::errors::AppResult;
use crate::models::workstream::{NewWorkstream, WorkstreamPatch};
use crate::ui::messages::{confirm, info, success, warning};
use crate::utils::formatting::ellipsize;
use crate::utils::table::Table;

pub fn handle(action: &WorkstreamAction, cfg: &Config, acting: Option<i64>) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let conn = &pool.conn;

    match action {
        WorkstreamAction::Add {
            project,
            name,
            description,
        } => {
            let viewer = optional_viewer(&pool, acting)?;
            let new = NewWorkstream {
                project_id: *project,
                name: name.clone(),
                description: description.clone(),
            };
            let w = WorkstreamLogic::create(conn, viewer.as_ref(), &new)?;
            success(format!(
                "Workstream #{} added to project #{}: {}",
                w.id, w.project_id, w.name
            ));
        }

        WorkstreamAction::Edit {
            id,
            name,
            description,
        } => {
            let viewer = optional_viewer(&pool, acting)?;
            let patch = WorkstreamPatch {
                name: name.clone(),
                description: description.clone(),
            };
            let w = WorkstreamLogic::update(conn, viewer.as_ref(), *id, &patch)?;
            success(format!("Workstream #{} updated: {}", w.id, w.name));
        }

        WorkstreamAction::Del { id, yes } => {
            let viewer = optional_viewer(&pool, acting)?;
            if !*yes && !confirm(&format!("Delete workstream #{id}?")) {
                warning("Deletion cancelled.");
                return Ok(());
            }
            WorkstreamLogic::delete(conn, viewer.as_ref(), *id)?;
            success(format!("Workstream #{id} deleted."));
        }

        WorkstreamAction::List { project, list } => {
            resolve_viewer(&pool, acting, None)?;
            let page =
                WorkstreamLogic::list(conn, *project, &list.to_query(), cfg.default_page_size)?;

            if page.items.is_empty() {
                info("No workstreams found.");
                return Ok(());
            }

            let project_names = projects::names(conn)?;
            let mut table = Table::new(vec!["ID", "PROJECT", "NAME", "DESCRIPTION"]);
            for w in &page.items {
                table.add_row(vec![
                    w.id.to_string(),
                    project_names
                        .get(&w.project_id)
                        .cloned()
                        .unwrap_or_else(|| format!("#{}", w.project_id)),
                    w.name.clone(),
                    ellipsize(&w.description, 50),
                ]);
            }
            print!("{}", table.render(cfg.separator()));
            println!("{}", page_footer(&page));
        }
    }

    Ok(())
}
