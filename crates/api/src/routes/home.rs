use std::sync::Arc;

use axum::{extract::State, response::Html};
use maud::{html, Markup, DOCTYPE};

use crate::AppState;

/// Handler for the route listing page (GET /)
pub async fn welcome_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(welcome_page(&state.remote_url).into_string())
}

fn welcome_page(api_base: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Climate API" }
            }
            body {
                h1 { "Climate Observations API" }
                p {
                    "A read-only API over daily precipitation and temperature "
                    "readings from Hawaii weather stations."
                }
                h3 { "Available routes:" }
                ol {
                    li {
                        p { "Precipitation for the final year of data" }
                        p { a href=(format!("{}/api/v1.0/precipitation", api_base)) {
                            "/api/v1.0/precipitation"
                        } }
                    }
                    li {
                        p { "All stations" }
                        p { a href=(format!("{}/api/v1.0/station", api_base)) {
                            "/api/v1.0/station"
                        } }
                    }
                    li {
                        p { "Temperature readings of the most active station for the final year of data" }
                        p { a href=(format!("{}/api/v1.0/tobs", api_base)) {
                            "/api/v1.0/tobs"
                        } }
                    }
                    li {
                        p {
                            "Temperature statistics from a start date. Replace "
                            strong { "start" }
                            " with a date in yyyy-mm-dd form."
                        }
                        p { "/api/v1.0/start" }
                    }
                    li {
                        p {
                            "Temperature statistics between two dates, inclusive. Replace "
                            strong { "start" } " and " strong { "end" }
                            " with dates in yyyy-mm-dd form."
                        }
                        p { "/api/v1.0/start/end" }
                    }
                }
                p { a href=(format!("{}/docs", api_base)) { "API Docs" } }
            }
        }
    }
}
