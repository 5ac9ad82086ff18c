use crate::enums::{ AlertOperator, AlertType };
use crate::models::{ Alert, TriggerContext };

/// Title and body shown in the notifications center.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNotification {
    pub title: String,
    pub message: String,
}

pub fn render(alert: &Alert, context: &TriggerContext) -> RenderedNotification {
    let condition = condition_text(alert.operator, alert.value);

    match context.alert_type {
        AlertType::Price => {
            let symbol = context.token_symbol
                .as_deref()
                .or(alert.token_symbol.as_deref())
                .unwrap_or("Token")
                .to_uppercase();

            RenderedNotification {
                title: format!("{} Price Alert", symbol),
                message: format!(
                    "{} is now ${:.2}, {}",
                    symbol,
                    context.current_value,
                    condition
                ),
            }
        }
        AlertType::Portfolio => {
            let address = context.address.as_deref().unwrap_or(&alert.address);

            RenderedNotification {
                title: "Portfolio Value Alert".to_string(),
                message: format!(
                    "Portfolio {} is now worth ${:.2}, {}",
                    short_address(address),
                    context.current_value,
                    condition
                ),
            }
        }
    }
}

pub fn render_email_html(rendered: &RenderedNotification) -> String {
    format!(
        "<div style=\"font-family: sans-serif; max-width: 560px;\">\
        <h2>{title}</h2>\
        <p>{message}</p>\
        <p style=\"color: #888; font-size: 12px;\">\
        You are receiving this because you set up an alert on your portfolio dashboard. \
        This alert will not fire again until its cooldown has passed.\
        </p>\
        </div>",
        title = escape_html(&rendered.title),
        message = escape_html(&rendered.message),
    )
}

fn condition_text(operator: AlertOperator, threshold: f64) -> String {
    match operator {
        AlertOperator::Above => format!("above ${}", threshold),
        AlertOperator::Below => format!("below ${}", threshold),
        AlertOperator::PercentIncrease => format!("up {}% or more", threshold),
        AlertOperator::PercentDecrease => format!("down {}% or more", threshold),
    }
}

fn short_address(address: &str) -> String {
    if address.len() <= 12 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
