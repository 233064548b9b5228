//! Plain-text rendering of session output.

use std::fmt::Write;

use querychat_client::{ChatSession, ConversationState, Message, RateLimitInfo, Role};

pub fn banner(session: &ChatSession) -> String {
    let info = session.rate_limit_info();
    let restored = session.messages().len();
    let mut out = String::from("querychat: escribe tu pregunta (/help para ver comandos)\n");
    if restored > 0 {
        let _ = writeln!(out, "{restored} mensajes restaurados (/history para verlos)");
    }
    let _ = writeln!(out, "{} de {} consultas disponibles", info.remaining, info.total);
    out
}

pub fn reply(message: &Message, state: &ConversationState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", message.content);
    if let Some(sql) = &message.sql {
        let _ = writeln!(out, "SQL: {sql}");
    }
    if let Some(kind) = message.visualization {
        let _ = writeln!(out, "Visualización: {kind}");
    }
    if let Some(data) = &message.data {
        let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
        let _ = writeln!(out, "{pretty}");
    }
    out.push_str(&warnings(state));
    out
}

pub fn warnings(state: &ConversationState) -> String {
    let mut out = String::new();
    if state.cold_start_warning {
        out.push_str("Aviso: el servidor tardó en responder (arranque en frío).\n");
    }
    if state.rate_limit_warning {
        out.push_str("Aviso: se alcanzó el límite diario de consultas.\n");
    }
    out
}

pub fn session_error(state: &ConversationState) -> String {
    state
        .error
        .as_ref()
        .map(|e| format!("{e}\n"))
        .unwrap_or_default()
}

pub fn rate_limit(info: &RateLimitInfo) -> String {
    format!("{} de {} consultas disponibles\n", info.remaining, info.total)
}

pub fn history(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        let who = match message.role {
            Role::User => "tú",
            Role::Assistant => "asistente",
        };
        let _ = writeln!(
            out,
            "[{}] {who}: {}",
            message.timestamp.format("%Y-%m-%d %H:%M"),
            message.content
        );
    }
    out
}

pub fn help() -> String {
    "Comandos:\n  /history  muestra la conversación\n  /clear    borra la conversación\n  /limit    consultas restantes\n  /dismiss  oculta los avisos\n  /quit     salir\n"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use querychat_client::{QueryResponse, Visualization};

    fn ts() -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::parse_from_rfc3339("2024-06-01T10:30:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc)
    }

    #[test]
    fn reply_shows_sql_visualization_and_data() {
        let message = Message::assistant(
            QueryResponse {
                sql: Some("SELECT COUNT(*) FROM players".into()),
                data: Some(serde_json::json!([{ "total": 200 }])),
                visualization: Some(Visualization::Table),
                error: None,
            },
            ts(),
        );
        let out = reply(&message, &ConversationState::default());
        assert!(out.contains("SQL: SELECT COUNT(*) FROM players"));
        assert!(out.contains("Visualización: table"));
        assert!(out.contains("\"total\": 200"));
        assert!(!out.contains("Aviso"));
    }

    #[test]
    fn warnings_follow_state_flags() {
        let state = ConversationState {
            cold_start_warning: true,
            rate_limit_warning: true,
            ..ConversationState::default()
        };
        let out = warnings(&state);
        assert!(out.contains("arranque en frío"));
        assert!(out.contains("límite diario"));
    }

    #[test]
    fn history_lists_roles_in_order() {
        let messages = vec![
            Message::user("hola", ts()),
            Message::assistant_error("No se pudo conectar con el servidor", ts()),
        ];
        let out = history(&messages);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "[2024-06-01 10:30] tú: hola");
        assert!(lines[1].contains("asistente: Error: No se pudo conectar"));
    }

    #[test]
    fn rate_limit_line() {
        let info = RateLimitInfo {
            remaining: 12,
            total: 50,
        };
        assert_eq!(rate_limit(&info), "12 de 50 consultas disponibles\n");
    }
}
