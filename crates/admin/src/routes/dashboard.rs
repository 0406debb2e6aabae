//! Dashboard route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, extract::State};
use tracing::instrument;

use crate::{error::Result, services::DashboardCard, services::DashboardComposer, state::AppState};

/// Card view for templates.
#[derive(Debug, Clone)]
pub struct CardView {
    pub label: &'static str,
    pub value: String,
    pub icon: &'static str,
    pub color: &'static str,
}

impl From<DashboardCard> for CardView {
    fn from(card: DashboardCard) -> Self {
        Self {
            label: card.label,
            value: card.value,
            icon: card.icon,
            color: card.color.as_str(),
        }
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_path: String,
    pub cards: Vec<CardView>,
}

/// Dashboard page handler.
#[instrument(skip(state))]
pub async fn dashboard(State(state): State<AppState>) -> Result<DashboardTemplate> {
    let payments = state.payments();
    let cards = DashboardComposer::new(&payments).cards().await?;

    Ok(DashboardTemplate {
        current_path: "/".to_string(),
        cards: cards.into_iter().map(CardView::from).collect(),
    })
}

/// Dashboard cards as JSON.
#[instrument(skip(state))]
pub async fn cards(State(state): State<AppState>) -> Result<Json<Vec<DashboardCard>>> {
    let payments = state.payments();
    let cards = DashboardComposer::new(&payments).cards().await?;
    Ok(Json(cards))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::dashboard::CardColor;

    #[test]
    fn test_dashboard_renders_cards() {
        let template = DashboardTemplate {
            current_path: "/".to_string(),
            cards: vec![CardView::from(DashboardCard {
                label: "Payments",
                value: "12".to_string(),
                icon: "credit-card",
                color: CardColor::Green,
            })],
        };

        let html = template.render().unwrap();
        assert!(html.contains("Payments"));
        assert!(html.contains("12"));
        assert!(html.contains("card-green"));
        assert!(html.contains("icon-credit-card"));
    }

    #[test]
    fn test_dashboard_renders_empty_state() {
        let template = DashboardTemplate {
            current_path: "/".to_string(),
            cards: Vec::new(),
        };

        let html = template.render().unwrap();
        assert!(html.contains("No metrics"));
    }
}
