use chat_core::{AppViewModel, PanelViewModel, Role};

pub(crate) fn greeting() -> String {
    [
        "Compliance chat. Type a message to send it.",
        "Commands: /events toggles the events panel, /download claims a finished report, /quit exits.",
    ]
    .join("\n")
}

/// Renders the full chat view as plain text, one frame per dirty state.
pub(crate) fn render(view: &AppViewModel) -> String {
    let mut lines = Vec::new();

    for message in &view.messages {
        let speaker = match message.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        lines.push(format!("[{speaker}] {}", message.content));
    }

    if let Some(error) = &view.send_error {
        lines.push(format!("! chat failed: {error}"));
    }
    if view.awaiting_response {
        lines.push("assistant is working...".to_string());
    }

    if let Some(panel) = &view.panel {
        render_panel(panel, &mut lines);
    }

    lines.join("\n")
}

fn render_panel(panel: &PanelViewModel, lines: &mut Vec<String>) {
    let busy = if panel.busy { " *" } else { "" };
    lines.push(format!("[{}]{busy}", panel.toggle_label));

    if panel.open {
        for row in &panel.rows {
            lines.push(format!("  {}", row.title));
            if let Some(download) = &row.download {
                lines.push(format!(
                    "    Task completed. Report is available for download: {} (save as {})",
                    download.href, download.file_name
                ));
            }
        }
    }
    if let Some(error) = &panel.error {
        lines.push(format!("  ! {error}"));
    }
}
