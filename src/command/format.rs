//! Display setting commands: `\format`, `\a`, `\plan`, `\timing`,
//! `\autocommit`

use crate::output::{Alignment, BorderStyle};
use crate::session::Session;
use crate::settings::PlanDisplay;

/// Options understood by `\format`
pub const FORMAT_OPTIONS: &[&str] = &["alignment", "border", "null"];

/// Set or show one formatting option.
///
/// Returns `false` for an unknown option or an invalid value; the
/// setting is left unchanged in that case.
pub fn do_format(session: &mut Session, option: &str, value: Option<&str>) -> bool {
    let quiet = session.settings.quiet;

    match option {
        "alignment" => {
            if let Some(value) = value {
                match value.parse::<Alignment>() {
                    Ok(alignment) => session.settings.format.alignment = alignment,
                    Err(e) => {
                        session.eprintln(format!("\\format alignment: {}", e));
                        return false;
                    }
                }
            }
            if !quiet {
                let line = format!("Alignment format is {}.", session.settings.format.alignment);
                session.println(line);
            }
        }
        "border" => {
            if let Some(value) = value {
                match value.parse::<BorderStyle>() {
                    Ok(border) => session.settings.format.border = border,
                    Err(e) => {
                        session.eprintln(format!("\\format border: {}", e));
                        return false;
                    }
                }
            }
            if !quiet {
                let name = session.settings.format.border.format().name;
                session.println(format!("Border format is \"{}\".", name));
            }
        }
        "null" => {
            if let Some(value) = value {
                session.settings.format.null_display = value.to_string();
            }
            if !quiet {
                let line = format!("Null display is \"{}\".", session.settings.format.null_display);
                session.println(line);
            }
        }
        _ => {
            session.eprintln(format!(
                "\\format: unknown option \"{}\"; allowed options are {}",
                option,
                FORMAT_OPTIONS.join(", ")
            ));
            return false;
        }
    }

    true
}

/// `\a`: switch between aligned and unaligned output
pub fn toggle_alignment(session: &mut Session) -> bool {
    let next = if session.settings.format.alignment.is_aligned() {
        "unaligned"
    } else {
        "aligned"
    };
    do_format(session, "alignment", Some(next))
}

pub fn set_plan_display(session: &mut Session, value: &str) -> bool {
    match value.parse::<PlanDisplay>() {
        Ok(plan_display) => {
            session.settings.plan_display = plan_display;
            session.println(format!("Plan display is {}", plan_display));
            true
        }
        Err(e) => {
            session.eprintln(format!("\\plan: {}", e));
            false
        }
    }
}

pub fn toggle_timing(session: &mut Session) {
    session.settings.timing = !session.settings.timing;
    let line = format!("Timing {}", on_off(session.settings.timing));
    session.println(line);
}

pub fn toggle_autocommit(session: &mut Session) {
    let autocommit = !session.settings.autocommit;
    session.settings.autocommit = autocommit;
    session.conn.set_autocommit(autocommit);
    session.println(format!("Autocommit {}", on_off(autocommit)));
}

pub fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
