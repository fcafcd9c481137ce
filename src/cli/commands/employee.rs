use crate::cli::commands::{open_pool, optional_viewer, page_footer, resolve_viewer};
use crate::cli::parser::EmployeeAction;
use crate::config::Config;
use crate::core::employee::EmployeeLogic;
use crate::errors::AppResult;
use crate::models::employee::{Employee, EmployeePatch, NewEmployee};
use crate::models::role::Role;
use crate::ui::messages::{confirm, header, info, success, warning};
use crate::utils::formatting::{describe_role, yes_no};
use crate::utils::table::Table;

pub fn handle(action: &EmployeeAction, cfg: &Config, acting: Option<i64>) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let conn = &pool.conn;

    match action {
        EmployeeAction::Add {
            name,
            email,
            designation,
            role,
        } => {
            let viewer = optional_viewer(&pool, acting)?;
            let new = NewEmployee {
                name: name.clone(),
                email: email.clone(),
                designation: designation.clone(),
                role: Role::parse(role)?,
            };
            let e = EmployeeLogic::create(conn, viewer.as_ref(), &new)?;
            success(format!(
                "Employee #{} added: {} <{}> ({})",
                e.id,
                e.name,
                e.email,
                e.role.to_db_str()
            ));
        }

        EmployeeAction::Edit {
            id,
            name,
            email,
            designation,
            role,
            active,
        } => {
            let viewer = optional_viewer(&pool, acting)?;
            let patch = EmployeePatch {
                name: name.clone(),
                email: email.clone(),
                designation: designation.clone(),
                role: role.as_deref().map(Role::parse).transpose()?,
                active: *active,
            };
            let e = EmployeeLogic::update(conn, viewer.as_ref(), *id, &patch)?;
            success(format!("Employee #{} updated: {} <{}>", e.id, e.name, e.email));
        }

        EmployeeAction::Del { id, yes } => {
            let viewer = optional_viewer(&pool, acting)?;
            if !*yes && !confirm(&format!("Delete employee #{id}?")) {
                warning("Deletion cancelled.");
                return Ok(());
            }
            EmployeeLogic::delete(conn, viewer.as_ref(), *id)?;
            success(format!("Employee #{id} deleted."));
        }

        EmployeeAction::Show { id } => {
            let viewer = resolve_viewer(&pool, acting, Some(*id))?;
            let e = EmployeeLogic::get(conn, &viewer, *id)?;
            header(format!("Employee #{}", e.id), cfg.separator());
            println!("Name        : {}", e.name);
            println!("Email       : {}", e.email);
            println!("Designation : {}", e.designation);
            println!("Role        : {}", describe_role(e.role));
            println!("Active      : {}", yes_no(e.active));
            println!("Created     : {}", e.created_at);
        }

        EmployeeAction::List { list } => {
            let viewer = resolve_viewer(&pool, acting, None)?;
            let page =
                EmployeeLogic::list(conn, &viewer, &list.to_query(), cfg.default_page_size)?;

            if page.items.is_empty() {
                info("No employees found.");
                return Ok(());
            }

            print!("{}", render(&page.items, cfg.separator()));
            println!("{}", page_footer(&page));
        }
    }

    Ok(())
}

fn render(items: &[Employee], separator: char) -> String {
    let mut table = Table::new(vec!["ID", "NAME", "EMAIL", "DESIGNATION", "ROLE", "ACTIVE"]);
    for e in items {
        table.add_row(vec![
            e.id.to_string(),
            e.name.clone(),
            e.email.clone(),
            e.designation.clone(),
            describe_role(e.role),
            yes_no(e.active).to_string(),
        ]);
    }
    table.render(separator)
}
