use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, html};

use crate::models::{CandidateMovie, EditErrors, MAX_REVIEW_CHARS, Movie};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";
const BUTTON_CLASS: &str =
    "w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700";

pub fn index_page(movies: &[Movie]) -> String {
    page(
        "My Top Movies",
        html! {
            div class="max-w-4xl mx-auto px-6 py-12" {
                div class="flex items-start justify-between gap-6" {
                    div {
                        h1 class="text-3xl font-bold text-gray-900" { "My Top Movies" }
                        p class="mt-2 text-gray-600" { "These are my all-time favourite movies." }
                    }
                    a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/add" { "Add Movie" }
                }

                @if movies.is_empty() {
                    div class="mt-10 bg-white shadow rounded-lg p-8" {
                        p class="text-gray-600" { "No movies yet." }
                    }
                } @else {
                    div class="mt-10 space-y-4" {
                        @for movie in movies {
                            (movie_card(movie))
                        }
                    }
                }
            }
        },
    )
}

pub fn add_page(title: &str, error: Option<&str>) -> String {
    page(
        "Add Movie",
        html! {
            (card(html! {
                h1 class="text-2xl font-bold text-gray-900" { "Add a Movie" }
                form class="mt-8 space-y-6" method="post" action="/add" {
                    div {
                        label class="block text-sm font-medium text-gray-700" for="title" { "Movie Title" }
                        input class=(INPUT_CLASS) name="title" id="title" value=(title);
                        (field_error(error))
                    }
                    button class=(BUTTON_CLASS) type="submit" { "Done" }
                }
            }))
        },
    )
}

pub fn select_page(query: &str, candidates: &[CandidateMovie]) -> String {
    page(
        "Select Movie",
        html! {
            (card(html! {
                h1 class="text-2xl font-bold text-gray-900" { "Select Movie" }
                p class="mt-2 text-gray-600" { "Results for \u{201c}" (query) "\u{201d}" }
                @if candidates.is_empty() {
                    p class="mt-6 text-gray-600" { "Nothing matched." }
                } @else {
                    ul class="mt-6 space-y-2" {
                        @for candidate in candidates {
                            li {
                                a class="text-blue-600 hover:text-blue-800" href=(format!("/update?id={}", candidate.id)) {
                                    (candidate.title)
                                    @if let Some(year) = candidate.release_year() {
                                        span class="ml-2 text-gray-500" { "(" (year) ")" }
                                    }
                                }
                                @if let Some(overview) = &candidate.overview {
                                    p class="text-sm text-gray-500" { (overview) }
                                }
                            }
                        }
                    }
                }
                a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href="/add" { "Search again" }
            }))
        },
    )
}

pub fn edit_page(movie: &Movie, rating: &str, review: &str, errors: &EditErrors) -> String {
    page(
        "Edit Movie",
        html! {
            (card(html! {
                h1 class="text-2xl font-bold text-gray-900" { (movie.title) }
                p class="mt-2 text-gray-600" { "Edit Movie Rating" }
                form class="mt-8 space-y-6" method="post" action=(format!("/edit?id={}", movie.id)) {
                    div {
                        label class="block text-sm font-medium text-gray-700" for="rating" { "Your rating out of 10 (ex 7.5)" }
                        input class=(INPUT_CLASS) name="rating" id="rating" value=(rating);
                        (field_error(errors.rating))
                    }
                    div {
                        label class="block text-sm font-medium text-gray-700" for="review" { "Your review" }
                        input class=(INPUT_CLASS) name="review" id="review" maxlength=(MAX_REVIEW_CHARS) value=(review);
                        (field_error(errors.review))
                    }
                    button class=(BUTTON_CLASS) type="submit" { "Done" }
                }
            }))
        },
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    page(
        "Error",
        html! {
            (card(html! {
                h1 class="text-2xl font-bold text-gray-900" {
                    (status.canonical_reason().unwrap_or("Error"))
                }
                p class="mt-4 text-gray-700" { (message) }
                a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
            }))
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body class="min-h-screen bg-gray-50" { (body) }
        }
    }
    .into_string()
}

fn card(inner: Markup) -> Markup {
    html! {
        div class="max-w-xl mx-auto px-6 py-12" {
            div class="bg-white shadow rounded-lg p-8" { (inner) }
        }
    }
}

fn field_error(message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p class="mt-2 text-sm text-red-600" { (message) }
        }
    }
}

fn movie_card(movie: &Movie) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-6" {
            img class="w-24 rounded" src=(movie.img_url) alt=(movie.title);
            div class="flex-1" {
                div class="flex items-start justify-between gap-4" {
                    h2 class="text-xl font-semibold text-gray-900" {
                        @if let Some(ranking) = movie.ranking {
                            span class="mr-2 text-gray-400" { "#" (ranking) }
                        }
                        (movie.title)
                        span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                    }
                    span class="text-lg font-semibold text-gray-900" {
                        @match movie.rating {
                            Some(rating) => { (rating) "/10" },
                            None => { span class="text-gray-400" { "unrated" } },
                        }
                    }
                }
                @if let Some(review) = &movie.review {
                    p class="mt-2 italic text-gray-700" { "\u{201c}" (review) "\u{201d}" }
                }
                p class="mt-2 text-sm text-gray-600" { (movie.description) }
                div class="mt-4 flex gap-4 text-sm" {
                    a class="text-blue-600 hover:text-blue-800" href=(format!("/edit?id={}", movie.id)) { "Update" }
                    a class="text-red-600 hover:text-red-800" href=(format!("/delete?id={}", movie.id)) { "Delete" }
                }
            }
        }
    }
}
