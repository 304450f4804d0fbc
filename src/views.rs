//! Server-rendered HTML pages.

use crate::models::SearchType;
use crate::projector::{ AuthorView, BookView, ResultItem };

/// State of the search page. `results` is `None` for the empty form and
/// `Some` (possibly empty) once a search has run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub search_type: Option<SearchType>,
    pub query: String,
    pub results: Option<Vec<ResultItem>>,
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        html_escape(title),
        body
    )
}

fn search_form(page: &SearchPage) -> String {
    let option = |search_type: SearchType| {
        let selected = if page.search_type == Some(search_type) { " selected" } else { "" };
        format!(
            "<option value=\"{}\"{}>{}</option>",
            search_type.as_str(),
            selected,
            search_type.label()
        )
    };

    format!(
        "<form method=\"post\" action=\"/\">\n\
         <select name=\"search_type\">{}{}</select>\n\
         <input type=\"text\" name=\"query\" value=\"{}\">\n\
         <button type=\"submit\">Search</button>\n\
         </form>\n",
        option(SearchType::BookTitle),
        option(SearchType::Author),
        html_escape(&page.query)
    )
}

pub fn render_search(page: &SearchPage) -> String {
    let mut body = String::from("<h1>Book search</h1>\n");
    body.push_str(&search_form(page));

    if let Some(results) = &page.results {
        let label = page.search_type.map_or("", SearchType::label);
        body.push_str(
            &format!(
                "<h2>{} results for &quot;{}&quot;</h2>\n",
                label,
                html_escape(&page.query)
            )
        );

        if results.is_empty() {
            body.push_str("<p>No results</p>\n");
        } else {
            body.push_str("<ol class=\"results\">\n");
            for item in results {
                let subheading = item.subheading
                    .as_deref()
                    .map(|s| format!(" <span class=\"by\">{}</span>", html_escape(s)))
                    .unwrap_or_default();
                body.push_str(
                    &format!(
                        "<li><a href=\"{}\">{}</a>{} <span class=\"score\">{:.4}</span></li>\n",
                        html_escape(&item.href),
                        html_escape(&item.heading),
                        subheading,
                        item.score
                    )
                );
            }
            body.push_str("</ol>\n");
        }
    }

    layout("Book search", &body)
}

pub fn render_book(view: &BookView) -> String {
    let mut body = format!("<h1>{}</h1>\n<dl>\n", html_escape(&view.title));
    if let Some(author) = &view.author {
        body.push_str(&format!("<dt>Author</dt><dd>{}</dd>\n", html_escape(author)));
    }
    if let Some(year) = view.published_year {
        body.push_str(&format!("<dt>Published</dt><dd>{}</dd>\n", year));
    }
    if let Some(description) = &view.description {
        body.push_str(&format!("<dt>Description</dt><dd>{}</dd>\n", html_escape(description)));
    }
    body.push_str("</dl>\n<p><a href=\"/\">Back to search</a></p>\n");

    layout(&format!("Book: {}", view.title), &body)
}

pub fn render_author(view: &AuthorView) -> String {
    let mut body = format!("<h1>{}</h1>\n<dl>\n", html_escape(&view.name));
    if let Some(born) = &view.born {
        body.push_str(&format!("<dt>Born</dt><dd>{}</dd>\n", html_escape(born)));
    }
    body.push_str(&format!("<dt>About</dt><dd class=\"about\">{}</dd>\n", html_escape(&view.about)));
    body.push_str("</dl>\n<p><a href=\"/\">Back to search</a></p>\n");

    layout(&format!("Author: {}", view.name), &body)
}
