//! Wizard navigation endpoints.
//!
//! Every handler loads the task for the session, applies one navigation
//! operation, commits the result and then either redirects to the new step
//! (`303 See Other`) or returns the current view when nothing moved.
//! `time_range` is read-only.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};

use crate::evaluation::{compute_overlap, EvaluationTask, EvaluationUpdate, TimeRange};
use crate::render::step_url;
use crate::rest::dto::{ModelWindowQuery, OverlapResponse, StartQuery, WizardView};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;
use crate::session::TaskSessions;
use crate::wizard::Transition;

async fn load(state: &ApiState, session_id: &str) -> Result<EvaluationTask, ApiError> {
    state
        .sessions
        .load_task(session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No wizard task for session '{}'", session_id)))
}

fn build_view(
    state: &ApiState,
    session_id: &str,
    task: EvaluationTask,
) -> Result<WizardView, ApiError> {
    let seq = task.sequence();
    let back_link = seq.back_link();
    let back_link_html = back_link
        .as_ref()
        .map(|link| state.renderer.render(&state.site_root, session_id, link))
        .transpose()?;

    Ok(WizardView {
        session_id: session_id.to_string(),
        current_step: seq.current_step().to_string(),
        current_label: seq.current().map(|s| s.label.clone()),
        position: seq.position(),
        total_steps: seq.len(),
        is_last: seq.is_last(),
        back_link,
        back_link_html,
        task,
    })
}

/// Redirect for a navigating transition, the current view otherwise
fn respond(
    state: &ApiState,
    session_id: &str,
    task: EvaluationTask,
    transition: &Transition,
) -> Result<Response, ApiError> {
    match &transition.navigate_to {
        Some(step_id) => {
            let url = step_url(&state.site_root, session_id, step_id);
            tracing::info!(session = %session_id, step = %step_id, "Navigating");
            Ok(Redirect::to(&url).into_response())
        }
        None => Ok(Json(build_view(state, session_id, task)?).into_response()),
    }
}

/// Start a new evaluation task and go to its first step
#[utoipa::path(
    post,
    path = "/wizard",
    tag = "Wizard",
    params(
        ("session" = Option<String>, Query, description = "Existing session id to restart")
    ),
    responses(
        (status = 303, description = "Redirect to the first step"),
        (status = 400, description = "Invalid session id", body = ErrorResponse),
        (status = 422, description = "No steps configured", body = ErrorResponse)
    )
)]
pub async fn start(
    State(state): State<ApiState>,
    Query(query): Query<StartQuery>,
) -> Result<Response, ApiError> {
    let session_id = match query.session {
        Some(id) => {
            // Any previous task information is dropped
            state.sessions.discard(&id).await?;
            id
        }
        None => TaskSessions::new_session_id(),
    };

    let mut task = state.new_task();
    let transition = task.sequence_mut().first_step()?;
    let transition = state.sessions.commit(&session_id, &task, transition).await?;

    respond(&state, &session_id, task, &transition)
}

/// Get the current view of a session
#[utoipa::path(
    get,
    path = "/wizard/{session}",
    tag = "Wizard",
    params(
        ("session" = String, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Current wizard view", body = WizardView),
        (status = 404, description = "No task for session", body = ErrorResponse)
    )
)]
pub async fn view(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Result<Json<WizardView>, ApiError> {
    let task = load(&state, &session_id).await?;
    Ok(Json(build_view(&state, &session_id, task)?))
}

/// Discard the task of a session
#[utoipa::path(
    delete,
    path = "/wizard/{session}",
    tag = "Wizard",
    params(
        ("session" = String, Path, description = "Session id")
    ),
    responses(
        (status = 204, description = "Task discarded"),
        (status = 400, description = "Invalid session id", body = ErrorResponse)
    )
)]
pub async fn discard(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.sessions.discard(&session_id).await?;
    tracing::info!(session = %session_id, "Discarded wizard task");
    Ok(StatusCode::NO_CONTENT)
}

/// Show a step page, making it the current step
#[utoipa::path(
    get,
    path = "/wizard/{session}/step/{step}",
    tag = "Wizard",
    params(
        ("session" = String, Path, description = "Session id"),
        ("step" = String, Path, description = "Step id, not required to be part of the sequence")
    ),
    responses(
        (status = 200, description = "Wizard view for the step", body = WizardView),
        (status = 404, description = "No task for session", body = ErrorResponse)
    )
)]
pub async fn show_step(
    State(state): State<ApiState>,
    Path((session_id, step_id)): Path<(String, String)>,
) -> Result<Json<WizardView>, ApiError> {
    let mut task = load(&state, &session_id).await?;
    let transition = task.sequence_mut().set_step(&step_id);
    state.sessions.commit(&session_id, &task, transition).await?;

    // Navigating to the page being shown is realized by rendering it
    Ok(Json(build_view(&state, &session_id, task)?))
}

/// Submit a step form and continue to the next step
#[utoipa::path(
    post,
    path = "/wizard/{session}/step/{step}",
    tag = "Wizard",
    params(
        ("session" = String, Path, description = "Session id"),
        ("step" = String, Path, description = "Step being submitted")
    ),
    request_body(content = EvaluationUpdate, description = "Answers collected on the step"),
    responses(
        (status = 303, description = "Redirect to the next step"),
        (status = 200, description = "No next step; current view", body = WizardView),
        (status = 400, description = "Malformed answers", body = ErrorResponse),
        (status = 404, description = "No task for session", body = ErrorResponse)
    )
)]
pub async fn submit_step(
    State(state): State<ApiState>,
    Path((session_id, step_id)): Path<(String, String)>,
    update: Result<Json<EvaluationUpdate>, JsonRejection>,
) -> Result<Response, ApiError> {
    let mut task = load(&state, &session_id).await?;

    // A form without a JSON body carries no answers; a broken one is refused
    let update = match update {
        Ok(Json(update)) => Some(update),
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => return Err(ApiError::BadRequest(rejection.body_text())),
    };

    let arrived = task.sequence_mut().set_step(&step_id);
    if let Some(update) = update {
        task.apply(update);
    }
    let next = task.sequence_mut().next_step();
    let advanced = next.is_navigation();

    // One write covers both the jump and the answers
    let transition = if advanced { next } else { arrived };
    let transition = state.sessions.commit(&session_id, &task, transition).await?;

    if !advanced {
        return Ok(Json(build_view(&state, &session_id, task)?).into_response());
    }
    respond(&state, &session_id, task, &transition)
}

/// Go back to the previous step
#[utoipa::path(
    post,
    path = "/wizard/{session}/back",
    tag = "Wizard",
    params(
        ("session" = String, Path, description = "Session id")
    ),
    responses(
        (status = 303, description = "Redirect to the previous step"),
        (status = 200, description = "No previous step; current view", body = WizardView),
        (status = 404, description = "No task for session", body = ErrorResponse)
    )
)]
pub async fn back(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Result<Response, ApiError> {
    let mut task = load(&state, &session_id).await?;
    let transition = task.sequence_mut().previous_step();
    let transition = state.sessions.commit(&session_id, &task, transition).await?;

    respond(&state, &session_id, task, &transition)
}

/// Overlap of the model window with the session's observational dataset
#[utoipa::path(
    get,
    path = "/wizard/{session}/time-range",
    tag = "Wizard",
    params(
        ("session" = String, Path, description = "Session id"),
        ("start" = String, Query, description = "Model data start, YYYY-MM-DD HH:MM:SS"),
        ("end" = String, Query, description = "Model data end, YYYY-MM-DD HH:MM:SS")
    ),
    responses(
        (status = 200, description = "Model, observation and overlapping windows", body = OverlapResponse),
        (status = 400, description = "Malformed model window", body = ErrorResponse),
        (status = 404, description = "No task, or no known observational dataset", body = ErrorResponse)
    )
)]
pub async fn time_range(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
    Query(query): Query<ModelWindowQuery>,
) -> Result<Json<OverlapResponse>, ApiError> {
    let model = TimeRange::parse(&query.start, &query.end)
        .map_err(|e| ApiError::BadRequest(format!("Invalid model time range: {}", e)))?;
    if model.start > model.end {
        return Err(ApiError::BadRequest(
            "Model time range ends before it starts".to_string(),
        ));
    }

    let task = load(&state, &session_id).await?;
    let observation = task.observation_window().ok_or_else(|| {
        ApiError::NotFound(format!(
            "Observational dataset '{}' not found",
            task.observational_dataset_id
        ))
    })?;

    Ok(Json(OverlapResponse {
        model,
        observation,
        overlap: compute_overlap(&model, &observation),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::wizard::Step;
    use axum::http::header::LOCATION;

    fn make_state(steps: &[(&str, &str)]) -> ApiState {
        let mut config = Config::default();
        config.wizard.steps = steps.iter().map(|&(id, label)| Step::new(id, label)).collect();
        config.server.site_root = "/rcmet".to_string();
        ApiState::with_sessions(&config, TaskSessions::in_memory()).unwrap()
    }

    fn scenario_state() -> ApiState {
        make_state(&[("init", "Start"), ("params", "Parameters"), ("review", "Review")])
    }

    fn location(response: &Response) -> &str {
        response.headers()[LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_start_redirects_to_first_step() {
        let state = scenario_state();
        let response = start(
            State(state.clone()),
            Query(StartQuery {
                session: Some("s1".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/rcmet/wizard/s1/step/init");

        let task: EvaluationTask = state.sessions.load_task("s1").await.unwrap().unwrap();
        assert_eq!(task.sequence().current_step(), "init");
    }

    #[tokio::test]
    async fn test_start_without_steps_is_invalid_sequence() {
        let state = make_state(&[]);
        let result = start(State(state.clone()), Query(StartQuery::default())).await;
        assert!(matches!(result, Err(ApiError::InvalidSequence(_))));
    }

    #[tokio::test]
    async fn test_start_discards_previous_task() {
        let state = scenario_state();
        let mut old = state.new_task();
        old.sequence_mut().set_step("review");
        old.metric = Some("bias".to_string());
        state.sessions.save_task("s1", &old).await.unwrap();

        start(
            State(state.clone()),
            Query(StartQuery {
                session: Some("s1".to_string()),
            }),
        )
        .await
        .unwrap();

        let task: EvaluationTask = state.sessions.load_task("s1").await.unwrap().unwrap();
        assert_eq!(task.sequence().current_step(), "init");
        assert!(task.metric.is_none());
    }

    #[tokio::test]
    async fn test_view_unknown_session() {
        let state = scenario_state();
        let result = view(State(state), Path("missing".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_view_rejects_bad_session_id() {
        let state = scenario_state();
        let result = view(State(state), Path("a.b".to_string())).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_show_step_sets_step_and_renders_back_link() {
        let state = scenario_state();
        state.sessions.save_task("s1", &state.new_task()).await.unwrap();

        let resp = show_step(
            State(state.clone()),
            Path(("s1".to_string(), "params".to_string())),
        )
        .await
        .unwrap();

        assert_eq!(resp.current_step, "params");
        assert_eq!(resp.position, Some(1));
        assert_eq!(resp.back_link.as_ref().unwrap().step_id, "init");
        assert_eq!(
            resp.back_link_html.as_deref(),
            Some("<div class='box nav'>Back to <a href='/rcmet/wizard/s1/step/init'>Start</a></div>")
        );

        let task: EvaluationTask = state.sessions.load_task("s1").await.unwrap().unwrap();
        assert_eq!(task.sequence().current_step(), "params");
    }

    #[tokio::test]
    async fn test_show_step_accepts_unknown_step() {
        let state = scenario_state();
        state.sessions.save_task("s1", &state.new_task()).await.unwrap();

        let resp = show_step(
            State(state.clone()),
            Path(("s1".to_string(), "nonexistent".to_string())),
        )
        .await
        .unwrap();
        assert_eq!(resp.current_step, "nonexistent");
        assert_eq!(resp.position, None);
        assert!(resp.back_link.is_none());
    }

    #[tokio::test]
    async fn test_submit_step_applies_update_and_advances() {
        let state = scenario_state();
        state.sessions.save_task("s1", &state.new_task()).await.unwrap();

        let update = EvaluationUpdate {
            spatial_regrid_option: Some("obs".to_string()),
            temporal_regrid_option: Some("annual".to_string()),
            ..EvaluationUpdate::default()
        };
        let response = submit_step(
            State(state.clone()),
            Path(("s1".to_string(), "params".to_string())),
            Ok(Json(update)),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/rcmet/wizard/s1/step/review");

        let task: EvaluationTask = state.sessions.load_task("s1").await.unwrap().unwrap();
        assert_eq!(task.sequence().current_step(), "review");
        assert_eq!(task.spatial_regrid_option.as_deref(), Some("obs"));
    }

    #[tokio::test]
    async fn test_submit_last_step_returns_view() {
        let state = scenario_state();
        state.sessions.save_task("s1", &state.new_task()).await.unwrap();

        let update = EvaluationUpdate {
            metric: Some("rms".to_string()),
            ..EvaluationUpdate::default()
        };
        let response = submit_step(
            State(state.clone()),
            Path(("s1".to_string(), "review".to_string())),
            Ok(Json(update)),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        // The answers are still written even though nothing moved
        let task: EvaluationTask = state.sessions.load_task("s1").await.unwrap().unwrap();
        assert_eq!(task.sequence().current_step(), "review");
        assert_eq!(task.metric.as_deref(), Some("rms"));
    }

    #[tokio::test]
    async fn test_back() {
        let state = scenario_state();
        let mut task = state.new_task();
        task.sequence_mut().set_step("review");
        state.sessions.save_task("s1", &task).await.unwrap();

        let response = back(State(state.clone()), Path("s1".to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/rcmet/wizard/s1/step/params");
    }

    #[tokio::test]
    async fn test_back_from_first_step_is_noop() {
        let state = scenario_state();
        let mut task = state.new_task();
        task.sequence_mut().first_step().unwrap();
        state.sessions.save_task("s1", &task).await.unwrap();

        let response = back(State(state.clone()), Path("s1".to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let task: EvaluationTask = state.sessions.load_task("s1").await.unwrap().unwrap();
        assert_eq!(task.sequence().current_step(), "init");
    }

    fn window(start: &str, end: &str) -> Query<ModelWindowQuery> {
        Query(ModelWindowQuery {
            start: start.to_string(),
            end: end.to_string(),
        })
    }

    #[tokio::test]
    async fn test_time_range_overlap() {
        let state = scenario_state();
        let mut task = state.new_task();
        task.observational_dataset_id = "3".to_string();
        state.sessions.save_task("s1", &task).await.unwrap();

        let resp = time_range(
            State(state),
            Path("s1".to_string()),
            window("1990-01-01 00:00:00", "2005-06-30 00:00:00"),
        )
        .await
        .unwrap();

        let overlap = resp.overlap.unwrap();
        assert_eq!(overlap.start_string(), "1998-01-01 00:00:00");
        assert_eq!(overlap.end_string(), "2005-06-30 00:00:00");
        assert_eq!(resp.observation.end_string(), "2010-01-01 00:00:00");
    }

    #[tokio::test]
    async fn test_time_range_disjoint_has_no_overlap() {
        let state = scenario_state();
        let mut task = state.new_task();
        task.observational_dataset_id = "2".to_string();
        state.sessions.save_task("s1", &task).await.unwrap();

        let resp = time_range(
            State(state),
            Path("s1".to_string()),
            window("1950-01-01 00:00:00", "1960-01-01 00:00:00"),
        )
        .await
        .unwrap();
        assert!(resp.overlap.is_none());
    }

    #[tokio::test]
    async fn test_time_range_without_dataset() {
        let state = scenario_state();
        state.sessions.save_task("s1", &state.new_task()).await.unwrap();

        let result = time_range(
            State(state),
            Path("s1".to_string()),
            window("1990-01-01 00:00:00", "2000-01-01 00:00:00"),
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_time_range_rejects_bad_window() {
        let state = scenario_state();
        let mut task = state.new_task();
        task.observational_dataset_id = "1".to_string();
        state.sessions.save_task("s1", &task).await.unwrap();

        let garbled = time_range(
            State(state.clone()),
            Path("s1".to_string()),
            window("1990-01-01", "2000-01-01 00:00:00"),
        )
        .await;
        assert!(matches!(garbled, Err(ApiError::BadRequest(_))));

        let reversed = time_range(
            State(state),
            Path("s1".to_string()),
            window("2000-01-01 00:00:00", "1990-01-01 00:00:00"),
        )
        .await;
        assert!(matches!(reversed, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_discard() {
        let state = scenario_state();
        state.sessions.save_task("s1", &state.new_task()).await.unwrap();

        let status = discard(State(state.clone()), Path("s1".to_string())).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let result = view(State(state), Path("s1".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
