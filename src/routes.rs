use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{AddForm, EditErrors, EditForm, IdQuery},
    ranking, templates,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/add", get(add_form).post(add_search))
        .route("/update", get(update))
        .route("/edit", get(edit_form).post(edit_save))
        .route("/delete", get(delete))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let mut movies = state.store.list_all().await?;
    let changed = ranking::assign_rankings(&mut movies);
    state.store.persist_rankings(&changed).await?;

    debug!(movies = movies.len(), reranked = changed.len(), "listing movies");
    Ok(Html(templates::index_page(&movies)))
}

pub async fn add_form() -> Html<String> {
    Html(templates::add_page("", None))
}

pub async fn add_search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddForm>,
) -> AppResult<Html<String>> {
    let title = form.title.trim();
    if title.is_empty() {
        return Ok(Html(templates::add_page("", Some("A movie title is required."))));
    }

    let candidates = state.tmdb.search_movies(title).await?;
    Ok(Html(templates::select_page(title, &candidates)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IdQuery>,
) -> AppResult<Redirect> {
    let Some(raw) = q.value() else {
        return Ok(Redirect::to("/"));
    };
    let external_id: i32 = raw
        .parse()
        .map_err(|_| AppError::Validation(format!("\"{raw}\" is not a movie catalog id")))?;

    let new_movie = state.tmdb.movie_details(external_id).await?;
    let movie = state.store.insert(new_movie).await?;

    info!(movie_id = movie.id, external_id, title = %movie.title, "added movie");
    Ok(Redirect::to(&format!("/edit?id={}", movie.id)))
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IdQuery>,
) -> AppResult<Html<String>> {
    let movie = state.store.get(internal_id(&q)?).await?;
    let rating = movie.rating.map(|r| r.to_string()).unwrap_or_default();
    let review = movie.review.clone().unwrap_or_default();

    Ok(Html(templates::edit_page(&movie, &rating, &review, &EditErrors::default())))
}

pub async fn edit_save(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IdQuery>,
    Form(form): Form<EditForm>,
) -> AppResult<Response> {
    let mut movie = state.store.get(internal_id(&q)?).await?;

    let (rating, review) = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            debug!(movie_id = movie.id, ?errors, "edit form rejected");
            let body = templates::edit_page(&movie, &form.rating, &form.review, &errors);
            return Ok(Html(body).into_response());
        },
    };

    movie.rating = Some(rating);
    movie.review = Some(review);
    let movie = state.store.update(movie).await?;

    info!(movie_id = movie.id, rating, "rated movie");
    Ok(Redirect::to("/").into_response())
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IdQuery>,
) -> AppResult<Redirect> {
    match q.value().map(str::parse::<i32>) {
        Some(Ok(id)) => {
            if state.store.delete(id).await? {
                info!(movie_id = id, "deleted movie");
            } else {
                warn!(movie_id = id, "delete requested for unknown movie");
            }
        },
        _ => warn!(id = ?q.id, "delete requested without a valid movie id"),
    }

    Ok(Redirect::to("/"))
}

fn internal_id(q: &IdQuery) -> AppResult<i32> {
    let raw = q.value().ok_or_else(|| AppError::NotFound("movie".to_string()))?;
    raw.parse().map_err(|_| AppError::NotFound(format!("movie \"{raw}\"")))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;
    use crate::{
        store::{
            MovieStore,
            tests::{memory_store, new_movie, rated},
        },
        tmdb::tests::{client_for, mount_inception},
    };

    async fn app(server: &MockServer) -> (Router, MovieStore) {
        let store = memory_store().await;
        let state =
            Arc::new(AppState { store: store.clone(), tmdb: Arc::new(client_for(server)) });
        (router(state), store)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn listing_ranks_best_rating_highest() {
        let server = MockServer::start().await;
        let (app, store) = app(&server).await;
        let a = rated(&store, "A", Some(8.0)).await;
        let b = rated(&store, "B", Some(6.0)).await;
        let c = rated(&store, "C", None).await;

        let response = app.oneshot(get_req("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(store.get(a.id).await.unwrap().ranking, Some(3));
        assert_eq!(store.get(b.id).await.unwrap().ranking, Some(2));
        assert_eq!(store.get(c.id).await.unwrap().ranking, Some(1));
    }

    #[tokio::test]
    async fn ranking_follows_rating_changes() {
        let server = MockServer::start().await;
        let (app, store) = app(&server).await;
        let a = rated(&store, "A", Some(8.0)).await;
        let mut b = rated(&store, "B", Some(6.0)).await;

        app.clone().oneshot(get_req("/")).await.unwrap();
        assert_eq!(store.get(a.id).await.unwrap().ranking, Some(2));

        b.rating = Some(9.5);
        store.update(b.clone()).await.unwrap();
        app.oneshot(get_req("/")).await.unwrap();

        assert_eq!(store.get(a.id).await.unwrap().ranking, Some(1));
        assert_eq!(store.get(b.id).await.unwrap().ranking, Some(2));
    }

    #[tokio::test]
    async fn add_without_title_re_renders_form() {
        let server = MockServer::start().await;
        let (app, _store) = app(&server).await;

        let response = app.oneshot(post_form("/add", "title=++")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("A movie title is required."));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn add_then_select_inserts_and_redirects_to_edit() {
        let server = MockServer::start().await;
        mount_inception(&server).await;
        let (app, store) = app(&server).await;

        let response = app.clone().oneshot(post_form("/add", "title=Inception")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("/update?id=27205"));
        assert!(body.contains("Inception: The Cobol Job"));

        let response = app.clone().oneshot(get_req("/update?id=27205")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let movies = store.list_all().await.unwrap();
        assert_eq!(movies.len(), 1);
        let movie = &movies[0];
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.year, 2010);
        assert_eq!(movie.rating, None);
        assert_eq!(location(&response), format!("/edit?id={}", movie.id));

        let response = app.oneshot(get_req(location(&response))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Inception"));
    }

    #[tokio::test]
    async fn selecting_the_same_movie_twice_conflicts() {
        let server = MockServer::start().await;
        mount_inception(&server).await;
        let (app, store) = app(&server).await;

        let first = app.clone().oneshot(get_req("/update?id=27205")).await.unwrap();
        assert_eq!(first.status(), StatusCode::SEE_OTHER);

        let second = app.oneshot(get_req("/update?id=27205")).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn catalog_failure_inserts_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/27205"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let (app, store) = app(&server).await;

        let response = app.oneshot(get_req("/update?id=27205")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_without_id_goes_home() {
        let server = MockServer::start().await;
        let (app, _store) = app(&server).await;

        let response = app.clone().oneshot(get_req("/update")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let response = app.oneshot(get_req("/update?id=abc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn edit_saves_rating_and_review() {
        let server = MockServer::start().await;
        let (app, store) = app(&server).await;
        let movie = store.insert(new_movie("Heat")).await.unwrap();
        let uri = format!("/edit?id={}", movie.id);

        let response =
            app.oneshot(post_form(&uri, "rating=8.5&review=Great+shootout")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let saved = store.get(movie.id).await.unwrap();
        assert_eq!(saved.rating, Some(8.5));
        assert_eq!(saved.review.as_deref(), Some("Great shootout"));
    }

    #[tokio::test]
    async fn edit_with_bad_rating_keeps_movie_unchanged() {
        let server = MockServer::start().await;
        let (app, store) = app(&server).await;
        let movie = store.insert(new_movie("Heat")).await.unwrap();
        let uri = format!("/edit?id={}", movie.id);

        let response = app.oneshot(post_form(&uri, "rating=great&review=ok")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Enter the rating as a number"));
        assert_eq!(store.get(movie.id).await.unwrap(), movie);
    }

    #[tokio::test]
    async fn edit_with_overflowing_rating_is_rejected() {
        let server = MockServer::start().await;
        let (app, store) = app(&server).await;
        let movie = store.insert(new_movie("Heat")).await.unwrap();
        let uri = format!("/edit?id={}", movie.id);
        let body = format!("rating={}&review=x", "9".repeat(400));

        let response = app.clone().oneshot(post_form(&uri, &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.get(movie.id).await.unwrap().rating, None);

        let listing = body_text(app.oneshot(get_req("/")).await.unwrap()).await;
        assert!(!listing.contains("inf/10"));
    }

    #[tokio::test]
    async fn edit_of_missing_movie_is_not_found() {
        let server = MockServer::start().await;
        let (app, _store) = app(&server).await;

        for uri in ["/edit", "/edit?id=", "/edit?id=x", "/edit?id=99"] {
            let response = app.clone().oneshot(get_req(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }

        let response = app.oneshot(post_form("/edit?id=99", "rating=5&review=meh")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_removes_movie_from_listing() {
        let server = MockServer::start().await;
        let (app, store) = app(&server).await;
        let keep = rated(&store, "Keep", Some(7.0)).await;
        let gone = rated(&store, "Gone", Some(3.0)).await;

        let response =
            app.clone().oneshot(get_req(&format!("/delete?id={}", gone.id))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let body = body_text(app.oneshot(get_req("/")).await.unwrap()).await;
        assert!(body.contains("Keep"));
        assert!(!body.contains("Gone"));
        assert_eq!(store.get(keep.id).await.unwrap().ranking, Some(1));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_still_goes_home() {
        let server = MockServer::start().await;
        let (app, _store) = app(&server).await;

        for uri in ["/delete?id=404", "/delete", "/delete?id=nope"] {
            let response = app.clone().oneshot(get_req(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        }

        let response = app.oneshot(get_req("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
