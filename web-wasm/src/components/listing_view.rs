//! 読み取り専用のリスト表示と警告ブロック

use leptos::prelude::*;
use metron_common::listing::{ListMode, Listing, ListingCard, ListingRow};

fn render_rows(rows: Vec<ListingRow>) -> impl IntoView {
    rows.into_iter()
        .map(|row| {
            view! {
                <div class="listing-row">
                    <span class="listing-label">{format!("{}:", row.label)}</span>
                    " "
                    <span class="listing-value">{row.value}</span>
                </div>
            }
        })
        .collect_view()
}

fn render_card(card: ListingCard) -> impl IntoView {
    let quantities = card
        .quantities
        .into_iter()
        .enumerate()
        .map(|(i, rows)| {
            view! {
                <div class="listing-quantity">
                    <div class="listing-quantity-title">{format!("Grandeza {}", i + 1)}</div>
                    {render_rows(rows)}
                </div>
            }
        })
        .collect_view();

    view! {
        <div class="listing-card" class:missing-date=card.missing_date>
            <div class="listing-card-title">
                {format!("📄 {}", card.title)}
                {card.missing_date.then(|| view! { <span class="badge-warning">"sem data de calibração"</span> })}
            </div>
            {render_rows(card.rows)}
            {quantities}
        </div>
    }
}

#[component]
pub fn ListingView(listing: Listing) -> impl IntoView {
    let body = match listing.mode {
        ListMode::TagsOnly => view! {
            <div class="tag-grid">
                {listing
                    .tags
                    .into_iter()
                    .map(|tag| view! { <span class="tag-chip">{tag}</span> })
                    .collect_view()}
            </div>
        }
        .into_any(),
        _ => listing.cards.into_iter().map(render_card).collect_view().into_any(),
    };

    view! {
        <div class="listing">
            <strong>{format!("✅ {} instrumento(s)", listing.count)}</strong>
            {body}
            <WarningsBlock warnings=listing.warnings />
        </div>
    }
}

/// 描画できなかったレコードの警告
#[component]
pub fn WarningsBlock(warnings: Vec<String>) -> impl IntoView {
    (!warnings.is_empty()).then(|| {
        view! {
            <div class="warnings">
                <strong>"⚠️ Avisos de processamento:"</strong>
                <ul>
                    {warnings.into_iter().map(|w| view! { <li>{w}</li> }).collect_view()}
                </ul>
            </div>
        }
    })
}
