use crate::cli::commands::{open_pool, page_footer, resolve_viewer};
use crate::cli::parser::TaskAction;
use crate::config::Config;
use crate::core::tasks::{TaskLogic, TaskRules};
use crate::db::{projects, tasks, workstreams};
use crate::errors::{AppError, AppResult};
use crate::models::task::{NewTask, TaskPatch};
use crate::ui::messages::{confirm, info, success, warning};
use crate::utils::date::{parse_date, parse_date_or_today, parse_range};
use crate::utils::formatting::{ellipsize, lock_marker};
use crate::utils::table::Table;
use crate::utils::time::{format_hours, parse_hours, parse_optional_hours};

pub fn handle(action: &TaskAction, cfg: &Config, acting: Option<i64>) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let conn = &pool.conn;
    let rules = TaskRules::from(cfg);

    match action {
        TaskAction::Add {
            employee,
            date,
            project,
            workstream,
            hours,
            notes,
        } => {
            let viewer = resolve_viewer(&pool, acting, Some(*employee))?;
            let new = NewTask {
                employee_id: *employee,
                date: parse_date_or_today(date.as_ref())?,
                project_id: *project,
                workstream_id: *workstream,
                notes: notes.clone(),
                hours: parse_hours(hours)?,
            };
            let t = TaskLogic::create(conn, &viewer, &new, rules)?;
            success(format!(
                "Task #{} booked: {} on {} for employee #{}",
                t.id,
                format_hours(t.hours),
                t.date,
                t.employee_id
            ));
        }

        TaskAction::Edit {
            id,
            date,
            project,
            workstream,
            hours,
            notes,
        } => {
            let owner = tasks::get(conn, *id)?.employee_id;
            let viewer = resolve_viewer(&pool, acting, Some(owner))?;

            let date = match date {
                Some(d) => Some(parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?),
                None => None,
            };
            let patch = TaskPatch {
                date,
                project_id: *project,
                workstream_id: *workstream,
                notes: notes.clone(),
                hours: parse_optional_hours(hours.as_ref())?,
            };

            if patch.is_empty() {
                warning("Nothing to update.");
                return Ok(());
            }

            let t = TaskLogic::update(conn, &viewer, *id, &patch, rules)?;
            success(format!(
                "Task #{} updated: {} on {}",
                t.id,
                format_hours(t.hours),
                t.date
            ));
        }

        TaskAction::Del { id, yes } => {
            let owner = tasks::get(conn, *id)?.employee_id;
            let viewer = resolve_viewer(&pool, acting, Some(owner))?;

            if !*yes && !confirm(&format!("Delete task #{id}?")) {
                warning("Deletion cancelled.");
                return Ok(());
            }
            TaskLogic::delete(conn, &viewer, *id)?;
            success(format!("Task #{id} deleted."));
        }

        TaskAction::List {
            employee,
            range,
            list,
        } => {
            let viewer = resolve_viewer(&pool, acting, *employee)?;
            let window = range.as_deref().map(parse_range).transpose()?;
            let page = TaskLogic::list(
                conn,
                &viewer,
                *employee,
                window.as_ref(),
                &list.to_query(),
                cfg.default_page_size,
            )?;

            if page.items.is_empty() {
                info("No time entries found.");
                return Ok(());
            }

            let project_names = projects::names(conn)?;
            let ws_names = workstreams::names(conn)?;

            let mut table = Table::new(vec![
                "ID", "EMP", "DATE", "PROJECT", "WORKSTREAM", "HOURS", "STATUS", "NOTES",
            ]);
            for t in &page.items {
                table.add_row(vec![
                    t.id.to_string(),
                    t.employee_id.to_string(),
                    t.date_str(),
                    project_names.get(&t.project_id).cloned().unwrap_or_default(),
                    ws_names.get(&t.workstream_id).cloned().unwrap_or_default(),
                    format_hours(t.hours),
                    lock_marker(t.final_submit),
                    ellipsize(&t.notes, 40),
                ]);
            }
            print!("{}", table.render(cfg.separator()));
            println!("{}", page_footer(&page));
        }
    }

    Ok(())
}
