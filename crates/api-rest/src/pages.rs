//! Server-rendered HTML pages.
//!
//! Pages are built per request from the core views. Every interpolated value is escaped; the
//! article body goes through `content::render_html`.

use html_escape::{encode_double_quoted_attribute, encode_text};
use newsdesk_core::content::render_html;
use newsdesk_core::models::format_millis;
use newsdesk_core::{Article, ArticleView, Comment, HomeView, SourceLink};
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:0 auto;padding:0 16px}\
.ticker{overflow:hidden;white-space:nowrap;border-bottom:1px solid #ddd;padding:8px 0}\
.ticker a{margin-right:32px}\
.card{display:block;border-bottom:1px solid #eee;padding:16px 0;color:inherit;text-decoration:none}\
.card img,.cover{max-width:100%}\
.article-body{white-space:pre-wrap}\
.article-image img{max-width:100%;margin:12px 0}\
.meta{color:#777;font-size:0.9em}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n\
<header><a href=\"/home\"><h1>Newsdesk</h1></a></header>\n{}</body>\n</html>\n",
        encode_text(title),
        STYLE,
        body
    )
}

/// Link to an article page.
fn article_href(article: &Article) -> String {
    format!("/{}", article.slug)
}

pub fn home_page(view: &HomeView) -> String {
    let mut body = String::new();

    if !view.ticker.is_empty() {
        body.push_str("<nav class=\"ticker\">");
        for item in &view.ticker {
            let _ = write!(
                body,
                "<a href=\"/{}\">{}</a>",
                encode_double_quoted_attribute(item.slug.as_str()),
                encode_text(&item.title)
            );
        }
        body.push_str("</nav>\n");
    }

    body.push_str("<main>\n");
    if view.articles.is_empty() {
        body.push_str("<p>No news yet.</p>\n");
    }
    for article in &view.articles {
        let _ = write!(
            body,
            "<a class=\"card\" href=\"{}\">",
            encode_double_quoted_attribute(&article_href(article))
        );
        if !article.image_url.is_empty() {
            let _ = write!(
                body,
                "<img src=\"{}\" alt=\"\" loading=\"lazy\">",
                encode_double_quoted_attribute(&article.image_url)
            );
        }
        let _ = writeln!(
            body,
            "<h2>{}</h2><p>{}</p><span class=\"meta\">{}</span></a>",
            encode_text(&article.title),
            encode_text(&article.short_desc),
            format_millis(article.timestamp)
        );
    }
    body.push_str("</main>\n");

    layout("Newsdesk", &body)
}

fn sources_section(sources: &[SourceLink]) -> String {
    if sources.is_empty() {
        return String::new();
    }

    let mut html = String::from("<section class=\"sources\"><h3>Sources</h3><ul>");
    for source in sources {
        let _ = write!(
            html,
            "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></li>",
            encode_double_quoted_attribute(&source.href),
            encode_text(&source.label)
        );
    }
    html.push_str("</ul></section>\n");
    html
}

fn comments_section(comments: &[Comment]) -> String {
    let mut html = format!(
        "<section class=\"comments\"><h3>Comments ({})</h3>",
        comments.len()
    );
    if comments.is_empty() {
        html.push_str("<p>No comments yet.</p>");
    }
    for comment in comments {
        let _ = write!(
            html,
            "<div class=\"comment\"><span class=\"meta\">{} &middot; {}</span><p>{}</p></div>",
            encode_text(&comment.user_email),
            format_millis(comment.timestamp),
            encode_text(&comment.text)
        );
    }
    html.push_str("</section>\n");
    html
}

pub fn article_page(view: &ArticleView) -> String {
    let article = &view.article;
    let mut body = String::from("<main><article>\n");

    let _ = writeln!(
        body,
        "<h1>{}</h1><span class=\"meta\">{}</span>",
        encode_text(&article.title),
        format_millis(article.timestamp)
    );
    if !article.image_url.is_empty() {
        let _ = writeln!(
            body,
            "<img class=\"cover\" src=\"{}\" alt=\"{}\">",
            encode_double_quoted_attribute(&article.image_url),
            encode_double_quoted_attribute(&article.title)
        );
    }
    let _ = writeln!(
        body,
        "<p class=\"lead\">{}</p>\n<div class=\"article-body\">{}</div>",
        encode_text(&article.short_desc),
        render_html(&view.segments)
    );
    body.push_str(&sources_section(&view.sources));
    body.push_str("</article>\n");
    body.push_str(&comments_section(&view.comments));
    body.push_str("</main>\n");

    layout(&article.title, &body)
}
