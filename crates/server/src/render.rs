//! HTML rendering of a `DashboardView`.
//!
//! Pages are plain strings; the two charts are Plotly.js traces serialized
//! as JSON and drawn client-side.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::fmt::Write;

use patrimoine_core::models::dashboard::{
    AccountAllocation, DashboardReport, DashboardView, PlatformAllocation, ALL_OWNERS_LABEL,
};
use patrimoine_core::models::holding::{Account, AssetType, Currency, Platform};
use patrimoine_core::models::valuation::{FxSource, PriceSource};

use crate::form::{HoldingForm, MIN_QUANTITY};

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

pub const SAVED_NOTICE: &str = "Sauvegardé !";
pub const EMPTY_PROMPT: &str = "Ajoute ton premier investissement dans le menu !";

/// Everything around the view that the page shows.
pub struct PageContext<'a> {
    pub view: &'a DashboardView,
    pub notice: Option<&'a str>,
    pub form_error: Option<&'a str>,
    pub form: &'a HoldingForm,
}

pub fn page(ctx: &PageContext<'_>) -> String {
    let view = ctx.view;
    let mut body = String::new();

    body.push_str(&sidebar(ctx));
    body.push_str("<main>");

    if let Some(notice) = ctx.notice {
        let _ = write!(body, r#"<div class="notice">✅ {}</div>"#, escape_html(notice));
    }
    for warning in &view.warnings {
        let _ = write!(
            body,
            r#"<div class="warning">⚠️ {}</div>"#,
            escape_html(&warning.to_string())
        );
    }

    match view.report() {
        Some(report) => body.push_str(&report_section(view.filter.label(), report)),
        None => {
            let _ = write!(body, r#"<div class="info">👈 {EMPTY_PROMPT}</div>"#);
        }
    }

    body.push_str("</main>");

    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Mon Patrimoine</title>
<script src="{PLOTLY_JS}"></script>
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

fn sidebar(ctx: &PageContext<'_>) -> String {
    let view = ctx.view;
    let mut out = String::from(r#"<aside><h2>🎯 Menu</h2>"#);

    // Owner selector
    out.push_str(r#"<form method="get" action="/"><label>Filtrer par :<select name="owner" onchange="this.form.submit()">"#);
    let choices = std::iter::once(ALL_OWNERS_LABEL).chain(view.owners.iter().map(String::as_str));
    for choice in choices {
        let selected = if choice == view.filter.label() { " selected" } else { "" };
        let _ = write!(
            out,
            r#"<option value="{v}"{selected}>{v}</option>"#,
            v = escape_html(choice)
        );
    }
    out.push_str(r#"</select></label><noscript><button>OK</button></noscript></form><hr>"#);

    // Add form
    let form = ctx.form;
    out.push_str(r#"<h3>➕ Ajouter</h3><form method="post" action="/holdings">"#);
    if let Some(err) = ctx.form_error {
        let _ = write!(out, r#"<div class="error">Erreur : {}</div>"#, escape_html(err));
    }
    let _ = write!(
        out,
        r#"<input type="hidden" name="view" value="{}">"#,
        escape_html(view.filter.label())
    );
    out.push_str(&text_input("Membre", "owner", &form.owner));
    out.push_str(&select("Plateforme", "platform", Platform::ALL.iter().map(|p| p.label()), &form.platform));
    out.push_str(&select("Compte", "account", Account::ALL.iter().map(|a| a.label()), &form.account));
    out.push_str(&select("Type", "asset_type", AssetType::ALL.iter().map(|t| t.label()), &form.asset_type));
    out.push_str(&text_input("Symbole (ex: VFV.TO)", "ticker", &form.ticker));
    out.push_str(&select("Devise", "currency", Currency::ALL.iter().map(|c| c.label()), &form.currency));
    let _ = write!(
        out,
        r#"<label>Qté<input type="number" name="quantity" min="{MIN_QUANTITY}" step="any" value="{}"></label>"#,
        escape_html(&form.quantity)
    );
    let _ = write!(
        out,
        r#"<label>Prix Achat<input type="number" name="purchase_price" min="0" step="any" value="{}"></label>"#,
        escape_html(&form.purchase_price)
    );
    out.push_str(r#"<button type="submit">Sauvegarder</button></form></aside>"#);

    out
}

fn text_input(label: &str, name: &str, value: &str) -> String {
    format!(
        r#"<label>{label}<input type="text" name="{name}" value="{}"></label>"#,
        escape_html(value)
    )
}

fn select<'a>(
    label: &str,
    name: &str,
    choices: impl Iterator<Item = &'a str>,
    current: &str,
) -> String {
    let mut out = format!(r#"<label>{label}<select name="{name}">"#);
    for choice in choices {
        let selected = if choice.eq_ignore_ascii_case(current.trim()) {
            " selected"
        } else {
            ""
        };
        let _ = write!(out, r#"<option{selected}>{}</option>"#, escape_html(choice));
    }
    out.push_str("</select></label>");
    out
}

fn report_section(label: &str, report: &DashboardReport) -> String {
    let mut out = String::new();
    let m = &report.metrics;

    let _ = write!(out, "<h1>💰 Patrimoine : {}</h1>", escape_html(label));
    let _ = write!(
        out,
        r#"<section class="metrics">
<div class="metric"><span>Total</span><strong>{}</strong></div>
<div class="metric"><span>Plus-Value</span><strong>{}</strong></div>
<div class="metric"><span>Lignes</span><strong>{}</strong></div>
</section><p class="fx">{}</p><hr>"#,
        format_cad(m.total_value_cad),
        format_signed_cad(m.total_gain_cad),
        m.row_count,
        escape_html(&fx_caption(report)),
    );

    let sunburst = script_json(&json!([sunburst_trace(&report.by_account)]));
    let pie = script_json(&json!([platform_pie_trace(&report.by_platform)]));
    let _ = write!(
        out,
        r#"<section class="charts"><div id="by-account"></div><div id="by-platform"></div></section>
<script>
Plotly.newPlot("by-account", {sunburst}, {{margin: {{t: 10, l: 10, r: 10, b: 10}}}}, {{responsive: true}});
Plotly.newPlot("by-platform", {pie}, {{margin: {{t: 10, l: 10, r: 10, b: 10}}}}, {{responsive: true}});
</script>"#
    );

    out.push_str(&holdings_table(report));
    out
}

fn fx_caption(report: &DashboardReport) -> String {
    let source = match &report.fx.source {
        FxSource::Identity => "identité".to_string(),
        FxSource::Live { provider } => provider.clone(),
        FxSource::Fallback => "taux par défaut".to_string(),
    };
    format!("{} = {} ({source})", report.fx.pair, report.fx.rate.normalize())
}

fn holdings_table(report: &DashboardReport) -> String {
    let mut out = String::from(
        "<table><thead><tr><th>Membre</th><th>Compte</th><th>Ticker</th>\
         <th>Quantité</th><th>Total_CAD</th><th>Plus_Value</th><th>Prix</th></tr></thead><tbody>",
    );
    for row in &report.rows {
        let source = match row.price_source {
            PriceSource::Live => "direct",
            PriceSource::PurchasePriceFallback => "prix d'achat",
        };
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td>\
             <td class=\"num\">{}</td><td class=\"num\">{}</td><td>{source}</td></tr>",
            escape_html(&row.holding.owner),
            row.holding.account,
            escape_html(&row.holding.ticker),
            row.holding.quantity.normalize(),
            format_amount(row.current_value_cad, 2),
            format_amount(row.unrealized_gain_cad, 2),
        );
    }
    out.push_str("</tbody></table>");
    out
}

// ── Charts ──────────────────────────────────────────────────────────

/// Account → ticker sunburst. Ticker ids are prefixed with their account so
/// the same ticker can sit under two accounts.
pub fn sunburst_trace(accounts: &[AccountAllocation]) -> Value {
    let mut ids = Vec::new();
    let mut labels = Vec::new();
    let mut parents = Vec::new();
    let mut values = Vec::new();

    for account in accounts {
        let account_id = account.account.label().to_string();
        ids.push(account_id.clone());
        labels.push(account_id.clone());
        parents.push(String::new());
        values.push(to_chart_number(account.value_cad));

        for slice in &account.tickers {
            ids.push(format!("{account_id}/{}", slice.label));
            labels.push(slice.label.clone());
            parents.push(account_id.clone());
            values.push(to_chart_number(slice.value_cad));
        }
    }

    json!({
        "type": "sunburst",
        "ids": ids,
        "labels": labels,
        "parents": parents,
        "values": values,
        "branchvalues": "total",
    })
}

/// Donut of value per platform.
pub fn platform_pie_trace(platforms: &[PlatformAllocation]) -> Value {
    let labels: Vec<&str> = platforms.iter().map(|p| p.platform.label()).collect();
    let values: Vec<f64> = platforms.iter().map(|p| to_chart_number(p.value_cad)).collect();
    json!({
        "type": "pie",
        "labels": labels,
        "values": values,
        "hole": 0.5,
    })
}

fn to_chart_number(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// JSON safe to inline inside a `<script>` element.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

// ── Formatting ──────────────────────────────────────────────────────

/// Whole dollars with thousands separators: `1,234 $`.
pub fn format_cad(value: Decimal) -> String {
    format!("{} $", format_amount(value, 0))
}

/// Like `format_cad` with an explicit sign: `+1,234 $`, `-56 $`.
pub fn format_signed_cad(value: Decimal) -> String {
    let rounded = value.round_dp(0);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        "+"
    };
    format!("{sign}{} $", format_amount(rounded.abs(), 0))
}

/// Round to `dp` places (half to even) and group the integer part by
/// thousands with commas.
pub fn format_amount(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp(dp);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", dp as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
body { margin: 0; display: flex; font-family: system-ui, sans-serif; color: #262730; }
aside { width: 300px; min-height: 100vh; padding: 1rem; background: #f0f2f6; box-sizing: border-box; }
aside label { display: block; margin: .5rem 0; font-size: .85rem; }
aside input, aside select { display: block; width: 100%; margin-top: .2rem; padding: .3rem; box-sizing: border-box; }
aside button { margin-top: .8rem; padding: .4rem 1rem; }
main { flex: 1; padding: 1rem 2rem; }
.metrics { display: flex; gap: 2rem; }
.metric span { display: block; font-size: .85rem; color: #555; }
.metric strong { font-size: 2rem; font-weight: 500; }
.charts { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
.charts div { min-height: 400px; }
.fx { font-size: .8rem; color: #777; }
table { border-collapse: collapse; width: 100%; margin-top: 1rem; }
th, td { border-bottom: 1px solid #e6e6e6; padding: .35rem .6rem; text-align: left; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.notice { background: #d4edda; padding: .6rem 1rem; border-radius: .4rem; margin-bottom: .6rem; }
.warning { background: #fff3cd; padding: .6rem 1rem; border-radius: .4rem; margin-bottom: .6rem; }
.info { background: #e7f1fb; padding: 1rem; border-radius: .4rem; }
.error { background: #f8d7da; padding: .5rem; border-radius: .4rem; }
"#;
