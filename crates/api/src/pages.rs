//! Server-rendered HTML pages.
//!
//! Every page is a pure function of its view-model; handlers load all data
//! first and only then render.

use annotate::Article;
use annotate::annotate;
use annotate::html::{escape_attr, escape_text};
use eval::{MergedMention, RunData, case_rows, format_percent, ground_truth_annotations, merge_mentions, prediction_annotations};
use stats::{LabeledEntityRow, StatsCell, StatsTable};

use crate::state::StatsLoadFailure;

pub const NO_CASES_MESSAGE: &str = "ERROR: no file with cases found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Benchmarks,
    Evaluation,
}

/// The (benchmark, type) cell whose entities are listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSelection {
    pub benchmark: String,
    pub type_label: String,
}

pub struct BenchmarksView<'a> {
    pub table: &'a StatsTable,
    pub selection: Option<CellSelection>,
    /// Matching rows, or the reason the labels file could not be read.
    pub entities: Result<Vec<LabeledEntityRow>, String>,
}

pub struct EvaluationView<'a> {
    pub runs: Vec<&'a str>,
    pub selected_run: Option<&'a str>,
    pub run: Option<&'a RunData>,
    pub articles: Result<&'a [Article], String>,
    pub selected_article: Option<usize>,
}

pub fn benchmarks_page(view: &BenchmarksView<'_>) -> String {
    let mut body = String::new();
    body.push_str("<h2>Benchmark statistics</h2>\n");
    body.push_str(&stats_table(view.table, view.selection.as_ref()));
    body.push_str(&cell_selectors(view.table, view.selection.as_ref()));

    if let Some(selection) = &view.selection {
        body.push_str(&format!(
            "<h2>Entities of type {} in {}</h2>\n",
            escape_text(&selection.type_label),
            escape_text(&selection.benchmark)
        ));
        match &view.entities {
            Ok(rows) => body.push_str(&entity_table(rows)),
            Err(e) => body.push_str(&error_panel(e)),
        }
    }

    layout("Benchmark statistics", Nav::Benchmarks, &body)
}

pub fn stats_error_page(failure: &StatsLoadFailure) -> String {
    let mut body = String::from("<h2>Benchmark statistics</h2>\n<p class=\"error\">Statistics could not be loaded for:</p>\n<ul>\n");
    for (benchmark, error) in &failure.failures {
        body.push_str(&format!(
            "<li><b>{}</b>: {} ({})</li>\n",
            escape_text(benchmark),
            error.kind(),
            escape_text(&error.to_string())
        ));
    }
    body.push_str("</ul>\n");
    layout("Benchmark statistics", Nav::Benchmarks, &body)
}

fn cell_href(benchmark: &str, type_label: &str) -> String {
    format!(
        "/benchmarks?benchmark={}&type={}",
        urlencoding::encode(benchmark),
        urlencoding::encode(type_label)
    )
}

fn stats_table(table: &StatsTable, selection: Option<&CellSelection>) -> String {
    let mut html = String::from("<table id=\"benchmarks_table\">\n<thead><tr><th></th>");
    for benchmark in &table.benchmarks {
        html.push_str(&format!("<th>{}</th>", escape_text(benchmark)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    // total row: shares of the cell's own sum, not selectable
    html.push_str("<tr><td><b>total</b><br>level 1<br>other</td>");
    for cell in &table.total {
        html.push_str(&format!(
            "<td><b>{}</b><br>{}<br>{}</td>",
            cell.sum.count,
            cell.level1.label(),
            cell.other.label()
        ));
    }
    html.push_str("</tr>\n");

    for row in &table.rows {
        html.push_str(&format!(
            "<tr><td><b>{}</b><br>level 1<br>other</td>",
            escape_text(&row.type_label)
        ));
        for (benchmark, cell) in table.benchmarks.iter().zip(&row.cells) {
            let selected = selection.is_some_and(|s| s.benchmark == *benchmark && s.type_label == row.type_label);
            html.push_str(&format!(
                "<td class=\"{}\"><a href=\"{}\">{}</a></td>",
                if selected { "cell selected" } else { "cell" },
                escape_attr(&cell_href(benchmark, &row.type_label)),
                type_cell(cell)
            ));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

fn type_cell(cell: &StatsCell) -> String {
    format!("<b>{}</b><br>{}<br>{}", cell.sum.label(), cell.level1.label(), cell.other.label())
}

fn cell_selectors(table: &StatsTable, selection: Option<&CellSelection>) -> String {
    let benchmarks = select(
        "benchmark",
        "benchmark_select",
        table.benchmarks.iter().map(String::as_str),
        selection.map(|s| s.benchmark.as_str()),
    );
    let types = select(
        "type",
        "type_select",
        table.type_labels(),
        selection.map(|s| s.type_label.as_str()),
    );
    format!(
        "<form class=\"selectors\" method=\"get\" action=\"/benchmarks\">\n<label>Benchmark {}</label>\n<label>Type {}</label>\n<button type=\"submit\">Show</button>\n</form>\n",
        benchmarks, types
    )
}

fn entity_table(rows: &[LabeledEntityRow]) -> String {
    if rows.is_empty() {
        return "<p class=\"hint\">No entities of this type.</p>\n".to_string();
    }

    let mut html = String::from(
        "<table id=\"entities_table\">\n<thead><tr><th>mention</th><th>span</th><th>entity</th><th>types</th></tr></thead>\n<tbody>\n",
    );
    for row in rows {
        html.push_str("<tr>");
        for column in &row.columns {
            html.push_str(&format!("<td>{}</td>", escape_text(column)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

pub fn evaluation_page(view: &EvaluationView<'_>) -> String {
    let mut body = String::new();
    body.push_str(&evaluation_selectors(view));

    if let Some(run) = view.run {
        body.push_str(&metrics_panel(run));
    }

    match &view.articles {
        Err(e) => body.push_str(&error_panel(e)),
        Ok(articles) => {
            if let Some((index, article)) = view
                .selected_article
                .and_then(|index| articles.get(index).map(|article| (index, article)))
            {
                body.push_str(&article_section(article, index, view.run));
            }
        }
    }

    layout("Evaluation", Nav::Evaluation, &body)
}

fn evaluation_selectors(view: &EvaluationView<'_>) -> String {
    let runs = select("run", "evaluation_file", view.runs.iter().copied(), view.selected_run);

    let articles = match &view.articles {
        Ok(articles) => {
            let mut html = String::from("<select name=\"article\" id=\"article\">\n<option value=\"\"></option>\n");
            for (index, article) in articles.iter().enumerate() {
                html.push_str(&format!(
                    "<option value=\"{}\"{}>{}</option>\n",
                    index,
                    if view.selected_article == Some(index) { " selected" } else { "" },
                    escape_text(&article.title)
                ));
            }
            html.push_str("</select>");
            html
        }
        Err(_) => "<select name=\"article\" id=\"article\" disabled></select>".to_string(),
    };

    format!(
        "<form class=\"selectors\" method=\"get\" action=\"/evaluation\">\n<label>Run {}</label>\n<label>Article {}</label>\n<button type=\"submit\">Show</button>\n</form>\n",
        runs, articles
    )
}

fn metrics_panel(run: &RunData) -> String {
    let Some(metrics) = run.metrics() else {
        return format!("<section id=\"evaluation\"><p class=\"error\">{}</p></section>\n", NO_CASES_MESSAGE);
    };

    format!(
        "<section id=\"evaluation\">\n<table class=\"metrics\">\n\
         <tr><th>true positives</th><td id=\"n_tp\">{}</td></tr>\n\
         <tr><th>false positives</th><td id=\"n_fp\">{}</td></tr>\n\
         <tr><th>false negatives</th><td id=\"n_fn\">{}</td></tr>\n\
         <tr><th>precision</th><td id=\"precision\">{}</td></tr>\n\
         <tr><th>recall</th><td id=\"recall\">{}</td></tr>\n\
         <tr><th>F1</th><td id=\"f_score\">{}</td></tr>\n\
         </table>\n</section>\n",
        metrics.true_positives,
        metrics.false_positives,
        metrics.false_negatives,
        format_percent(metrics.precision),
        format_percent(metrics.recall),
        format_percent(metrics.f1)
    )
}

fn article_section(article: &Article, index: usize, run: Option<&RunData>) -> String {
    let mut html = String::new();
    if !article.url.is_empty() {
        html.push_str(&format!(
            "<p id=\"article_link\"><a href=\"{}\" target=\"_blank\">Wikipedia article</a></p>\n",
            escape_attr(&article.url)
        ));
    }

    let (left, right, table) = match run {
        None => (
            article.labelled_text.clone(),
            "<p class=\"hint\">Select an evaluation run.</p>".to_string(),
            None,
        ),
        Some(run) if !run.has_cases() => (article.labelled_text.clone(), NO_CASES_MESSAGE.to_string(), None),
        Some(run) => {
            let cases = run.article_cases(index);
            let mentions = match run.article_data(index) {
                Some(data) => merge_mentions(data, cases),
                None => cases.iter().map(MergedMention::Case).collect(),
            };
            (
                annotate(&article.text, &ground_truth_annotations(cases)),
                annotate(&article.text, &prediction_annotations(&mentions)),
                Some(case_table(&article.text, cases)),
            )
        }
    };

    html.push_str(&format!(
        "<div class=\"panels\">\n\
         <div class=\"panel\"><h3>Ground truth</h3><div id=\"textfield_left\">{}</div></div>\n\
         <div class=\"panel\"><h3>Prediction</h3><div id=\"textfield_right\">{}</div></div>\n\
         </div>\n",
        left, right
    ));
    if let Some(table) = table {
        html.push_str(&table);
    }
    html
}

fn case_table(text: &str, cases: &[eval::EvaluationCase]) -> String {
    let mut html = String::from(
        "<table class=\"casesTable\">\n<tr><th>span</th><th>text</th><th>true ID</th><th>true name</th>\
         <th>detected</th><th>predicted ID</th><th>predicted name</th><th>case</th></tr>\n",
    );
    for row in case_rows(text, cases) {
        html.push_str(&format!(
            "<tr><td>{}, {}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            row.span.begin(),
            row.span.end(),
            escape_text(&row.text),
            escape_text(&row.true_id),
            escape_text(&row.true_name),
            row.detection,
            escape_text(&row.predicted_id),
            escape_text(&row.predicted_name),
            row.case_type.label()
        ));
    }
    html.push_str("</table>\n");
    html
}

fn select<'a>(name: &str, id: &str, options: impl Iterator<Item = &'a str>, selected: Option<&str>) -> String {
    let mut html = format!("<select name=\"{}\" id=\"{}\">\n", name, id);
    if selected.is_none() {
        html.push_str("<option value=\"\" selected></option>\n");
    }
    for option in options {
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            escape_attr(option),
            if selected == Some(option) { " selected" } else { "" },
            escape_text(option)
        ));
    }
    html.push_str("</select>");
    html
}

fn error_panel(message: &str) -> String {
    format!("<p class=\"error\">{}</p>\n", escape_text(message))
}

fn layout(title: &str, nav: Nav, body: &str) -> String {
    let link = |target: Nav, href: &str, label: &str| {
        format!(
            "<a href=\"{}\"{}>{}</a>",
            href,
            if target == nav { " class=\"active\"" } else { "" },
            label
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
    <header>
        <h1>NEL Viewer</h1>
        <nav>{benchmarks} {evaluation}</nav>
    </header>
    <main>
{body}
    </main>
</body>
</html>"#,
        title = escape_text(title),
        css = CSS,
        benchmarks = link(Nav::Benchmarks, "/benchmarks", "Benchmarks"),
        evaluation = link(Nav::Evaluation, "/evaluation", "Evaluation"),
        body = body,
    )
}

const CSS: &str = r#"
body { font-family: sans-serif; margin: 0; color: #222; }
header { display: flex; align-items: baseline; gap: 2em; padding: 0.5em 1em; background: #f4f4f4; border-bottom: 1px solid #ddd; }
header h1 { font-size: 1.3em; margin: 0; }
nav a { margin-right: 1em; }
nav a.active { font-weight: bold; }
main { padding: 1em; }
table { border-collapse: collapse; margin-bottom: 1em; }
th, td { border: 1px solid #ccc; padding: 4px 8px; vertical-align: top; }
td.cell a { color: inherit; text-decoration: none; display: block; }
td.cell:hover { background: #eef; }
td.selected { background: #cde; }
.selectors { margin: 1em 0; display: flex; gap: 1em; align-items: center; }
.panels { display: flex; gap: 1em; }
.panel { flex: 1; border: 1px solid #ccc; padding: 0.5em; line-height: 1.8; }
.metrics td { text-align: right; }
.error { color: #b00; font-weight: bold; }
.hint { color: #777; }
.tooltip { position: relative; display: inline; border-radius: 3px; padding: 1px 2px; }
.tooltip .tooltiptext { visibility: hidden; position: absolute; z-index: 1; bottom: 125%; left: 0; min-width: 12em; background: #333; color: #fff; padding: 4px 6px; border-radius: 4px; line-height: 1.3; }
.tooltip .tooltiptext a { color: #9cf; }
.tooltip:hover .tooltiptext { visibility: visible; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use ingest::{FetchError, ResultFiles};
    use stats::{BenchmarkTypeStats, Counts, build_table};

    fn table() -> StatsTable {
        let stats = |total: (u64, u64), disease: (u64, u64)| BenchmarkTypeStats {
            total: Counts(total.0, total.1),
            types: vec![("disease".to_string(), Counts(disease.0, disease.1))],
        };
        build_table(&[
            ("ours".to_string(), stats((10, 10), (5, 0))),
            ("conll".to_string(), stats((10, 10), (5, 0))),
        ])
    }

    fn files() -> ResultFiles {
        ResultFiles {
            run: "baseline".to_string(),
            approach: "spacy".to_string(),
            base_path: "evaluation-results/baseline/spacy".to_string(),
        }
    }

    fn article() -> Article {
        ingest::parse_articles(
            "development_labels.jsonl",
            r#"{"title": "Bonn <city>", "url": "https://en.wikipedia.org/wiki/Bonn", "text": "Bonn is in Germany.", "labels": [[[0, 4], "Q586"], [[11, 18], "Q183"]]}"#,
        )
        .unwrap()
        .remove(0)
    }

    #[test]
    fn test_benchmarks_page_marks_selected_cell() {
        let table = table();
        let view = BenchmarksView {
            table: &table,
            selection: Some(CellSelection {
                benchmark: "conll".to_string(),
                type_label: "disease".to_string(),
            }),
            entities: Ok(vec![LabeledEntityRow {
                columns: vec!["malaria".to_string(), "[0, 7]".to_string(), "Q12136".to_string(), "disease".to_string()],
            }]),
        };

        let html = benchmarks_page(&view);

        assert!(html.contains("<td class=\"cell selected\"><a href=\"/benchmarks?benchmark=conll&amp;type=disease\">"));
        assert_eq!(html.matches("cell selected").count(), 1);
        assert!(html.contains("<b>5 (25.00%)</b>"));
        assert!(html.contains("10 (50.00%)"));
        assert!(html.contains("<td>malaria</td>"));
        assert!(html.contains("<option value=\"conll\" selected>conll</option>"));
    }

    #[test]
    fn test_entity_error_is_shown() {
        let table = table();
        let view = BenchmarksView {
            table: &table,
            selection: Some(CellSelection {
                benchmark: "ours".to_string(),
                type_label: "disease".to_string(),
            }),
            entities: Err("not found: benchmarks/ours.labels.tsv".to_string()),
        };

        let html = benchmarks_page(&view);

        assert!(html.contains("<p class=\"error\">not found: benchmarks/ours.labels.tsv</p>"));
    }

    #[test]
    fn test_missing_cases_shows_error_and_ground_truth() {
        let articles = vec![article()];
        let missing = |path: String| Err(FetchError::NotFound { path });
        let run = RunData::from_documents(files(), missing(files().cases_path()), missing(files().articles_path()));
        let view = EvaluationView {
            runs: vec!["baseline/spacy"],
            selected_run: Some("baseline/spacy"),
            run: Some(&run),
            articles: Ok(articles.as_slice()),
            selected_article: Some(0),
        };

        let html = evaluation_page(&view);

        assert!(html.contains("<section id=\"evaluation\"><p class=\"error\">ERROR: no file with cases found.</p></section>"));
        assert!(html.contains("<div id=\"textfield_right\">ERROR: no file with cases found.</div>"));
        assert!(html.contains("<a href=\"https://www.wikidata.org/wiki/Q586\">Bonn [Q586]</a>"));
        assert!(!html.contains("casesTable"));
        assert!(html.contains("Bonn &lt;city&gt;"));
    }

    #[test]
    fn test_run_with_cases_renders_panels_and_table() {
        let articles = vec![article()];
        let cases = concat!(
            r#"[{"span": [0, 4], "true_entity": {"entity_id": "Q586", "name": "Bonn"}, "predicted_entity": {"entity_id": "Q586", "name": "Bonn"}, "detected": true, "predicted_by": "linker"},"#,
            r#" {"span": [11, 18], "true_entity": {"entity_id": "Q183", "name": "Germany"}, "detected": false}]"#,
            "\n"
        );
        let run = RunData::from_documents(
            files(),
            Ok(cases.to_string()),
            Ok(r#"{"evaluation_span": [0, 19], "entity_mentions": []}"#.to_string()),
        );
        let view = EvaluationView {
            runs: vec!["baseline/spacy"],
            selected_run: Some("baseline/spacy"),
            run: Some(&run),
            articles: Ok(articles.as_slice()),
            selected_article: Some(0),
        };

        let html = evaluation_page(&view);

        assert!(html.contains("<td id=\"precision\">100.00 %</td>"));
        assert!(html.contains("<td id=\"recall\">50.00 %</td>"));
        assert!(html.contains("<td id=\"n_fn\">1</td>"));
        assert!(html.contains("background-color:#bb8fce\">Germany"));
        assert!(html.contains("predicted by linker"));
        assert!(html.contains("<tr><td>11, 18</td><td>Germany</td><td>Q183</td><td>Germany</td><td>false negative</td><td>-</td><td>-</td><td>false negative</td></tr>"));
        assert!(html.contains("<a href=\"https://en.wikipedia.org/wiki/Bonn\" target=\"_blank\">Wikipedia article</a>"));
    }

    #[test]
    fn test_evaluation_page_without_selection() {
        let view = EvaluationView {
            runs: vec!["baseline/spacy", "baseline/flair"],
            selected_run: None,
            run: None,
            articles: Err("not found: development_labels.jsonl".to_string()),
            selected_article: None,
        };

        let html = evaluation_page(&view);

        assert!(html.contains("<option value=\"baseline/flair\">baseline/flair</option>"));
        assert!(html.contains("not found: development_labels.jsonl"));
        assert!(!html.contains("id=\"evaluation\""));
    }
}
