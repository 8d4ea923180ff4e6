//! Server-rendered HTML for the log page.

use bp_logger_domain::entities::{Block, Reading};
use bp_logger_domain::services::BLOCK_DAYS;
use bp_logger_domain::session::UserSession;

const ENTRY_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";
const DAY_FORMAT: &str = "%d/%m/%Y";

const STYLE: &str = "body{font-family:sans-serif;max-width:60rem;margin:1rem auto;padding:0 1rem}\
table{border-collapse:collapse;width:100%;margin-bottom:1.5rem}\
th,td{border:1px solid #ccc;padding:.3rem .5rem;text-align:left}\
tr.totals td{font-weight:bold;background:#eef}\
input[type=number]{width:4.5rem}\
.incomplete{color:#a60}.complete{color:#060}\
form.inline{display:inline}";

/// Escape text for use in HTML content and attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Full log page: entry form, download form and the blocks, newest first
pub fn render_index(blocks: &[Block], session: &UserSession) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>BP Logger</title>\n");
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));
    html.push_str("<h1>BP Logger</h1>\n");

    html.push_str(&entry_form(session));
    html.push_str(&download_form());

    if blocks.is_empty() {
        html.push_str("<p id=\"no-entries\">No readings logged yet.</p>\n");
    }

    let count = blocks.len();
    for (index, block) in blocks.iter().enumerate() {
        html.push_str(&block_section(count - index, block));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn entry_form(session: &UserSession) -> String {
    let mut html = String::from("<section id=\"new-entry\">\n<h2>New reading</h2>\n");
    html.push_str("<form method=\"post\" action=\"/\">\n");

    if session.knows_identity() {
        html.push_str(&format!(
            "<p>Logging as <strong>{}</strong> (DOB {}) <a href=\"/reset_user\">Change user</a></p>\n",
            escape(session.user_name.as_deref().unwrap_or_default()),
            escape(session.dob.as_deref().unwrap_or_default()),
        ));
    } else {
        html.push_str("<label>Name <input type=\"text\" name=\"name\" required></label>\n");
        html.push_str("<label>DOB <input type=\"text\" name=\"dob\" placeholder=\"dd/mm/yyyy\" required></label>\n");
        html.push_str("<label>Comment <input type=\"text\" name=\"comment\"></label>\n");
    }

    html.push_str("<fieldset><legend>Reading 1</legend>");
    html.push_str(&number_input("sys1"));
    html.push_str(&number_input("dia1"));
    html.push_str("</fieldset>\n<fieldset><legend>Reading 2</legend>");
    html.push_str(&number_input("sys2"));
    html.push_str(&number_input("dia2"));
    html.push_str("</fieldset>\n<button type=\"submit\">Save</button>\n</form>\n</section>\n");
    html
}

fn download_form() -> String {
    "<section id=\"download\">\n<h2>Download CSV</h2>\n\
<form method=\"post\" action=\"/download\">\n\
<label><input type=\"radio\" name=\"mode\" value=\"all\" checked> All readings</label>\n\
<label><input type=\"radio\" name=\"mode\" value=\"range\"> Date range</label>\n\
<label>From <input type=\"date\" name=\"start_date\"></label>\n\
<label>To <input type=\"date\" name=\"end_date\"></label>\n\
<button type=\"submit\">Download</button>\n</form>\n</section>\n"
        .to_string()
}

fn block_section(number: usize, block: &Block) -> String {
    let status = if block.is_complete {
        "<span class=\"complete\">Complete</span>".to_string()
    } else {
        format!(
            "<span class=\"incomplete\">In progress ({}/{} days)</span>",
            block.days_seen.len(),
            BLOCK_DAYS
        )
    };

    let mut html = format!(
        "<section class=\"block\">\n<h2>Block {} {}</h2>\n<table>\n\
<tr><th>Date/Time</th><th>Sys1</th><th>Dia1</th><th>Sys2</th><th>Dia2</th><th>Comment</th><th></th></tr>\n",
        number, status
    );

    for reading in &block.entries {
        html.push_str(&entry_row(reading));
    }

    if let Some(totals) = &block.totals {
        html.push_str(&format!(
            "<tr class=\"totals\"><td>Totals (excluding {})</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td colspan=\"2\"></td></tr>\n",
            block.first_day_excluded.format(DAY_FORMAT),
            totals.sys1,
            totals.dia1,
            totals.sys2,
            totals.dia2,
        ));
    }

    html.push_str("</table>\n</section>\n");
    html
}

fn entry_row(reading: &Reading) -> String {
    let edit_form = format!("edit-{}", reading.id);
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>\
<form id=\"{form}\" class=\"inline\" method=\"post\" action=\"/edit/{id}\"><button type=\"submit\">Save</button></form> \
<form class=\"inline\" method=\"post\" action=\"/delete/{id}\"><button type=\"submit\">Delete</button></form></td></tr>\n",
        reading.timestamp.format(ENTRY_TIME_FORMAT),
        form_input(&edit_form, "sys1", reading.systolic1),
        form_input(&edit_form, "dia1", reading.diastolic1),
        form_input(&edit_form, "sys2", reading.systolic2),
        form_input(&edit_form, "dia2", reading.diastolic2),
        escape(reading.comment.as_deref().unwrap_or_default()),
        form = edit_form,
        id = reading.id,
    )
}

fn number_input(name: &str) -> String {
    format!(
        "<label>{} <input type=\"number\" name=\"{}\" required></label>",
        name.to_uppercase(),
        name
    )
}

/// Number input bound to a form elsewhere in the row
fn form_input(form: &str, name: &str, value: i32) -> String {
    format!(
        "<input type=\"number\" form=\"{}\" name=\"{}\" value=\"{}\" required>",
        form, name, value
    )
}
