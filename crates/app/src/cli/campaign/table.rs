//! Terminal tables

use flashdeal_app::domain::campaigns::{SweepReport, records::CampaignRecord};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

pub(crate) fn campaign(record: &CampaignRecord) -> String {
    let mut summary = Builder::default();

    field(&mut summary, "Campaign", &record.uuid);
    field(&mut summary, "Title", &record.title);
    field(&mut summary, "Kind", &record.deal_kind);
    field(&mut summary, "Status", &record.status);
    field(&mut summary, "Discount mode", &record.discount_mode);
    field(&mut summary, "Starts", &record.window.start());
    field(&mut summary, "Ends", &record.window.end());
    field(&mut summary, "Priority", &record.visibility.priority);
    field(&mut summary, "Created by", &record.audit.created_by);
    field(&mut summary, "Version", &record.version);

    if let Some(badge) = &record.visibility.badge_text {
        field(&mut summary, "Badge", badge);
    }

    let mut summary = summary.build();
    summary.with(Style::modern_rounded());
    summary.modify(Columns::first(), Color::BOLD);

    let mut items = Builder::default();

    items.push_record([
        "Product",
        "Base",
        "Deal",
        "Off %",
        "Deal qty",
        "Stock",
        "Sold",
    ]);

    for item in &record.line_items {
        items.push_record([
            item.product.to_string(),
            item.base_price.to_string(),
            item.deal_price.to_string(),
            item.discount_percent
                .map_or_else(|| "-".to_string(), |d| d.to_string()),
            item.deal_quantity.to_string(),
            item.initial_stock.to_string(),
            item.sold_quantity.to_string(),
        ]);
    }

    let mut items = items.build();
    items.with(Style::modern_rounded());
    items.modify(Rows::first(), Color::BOLD);
    items.modify(Columns::new(1..7), Alignment::right());

    format!("{summary}\n{items}")
}

pub(crate) fn sweep(report: &SweepReport) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Campaign", "Outcome"]);

    let rows = [
        (&report.activated, "activated"),
        (&report.ended, "ended"),
        (&report.unsynced, "needs reconcile"),
        (&report.failed, "failed"),
    ];

    for (campaigns, outcome) in rows {
        for campaign in campaigns {
            builder.push_record([campaign.to_string(), outcome.to_string()]);
        }
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);

    table.to_string()
}

fn field(builder: &mut Builder, label: &str, value: &impl ToString) {
    builder.push_record([label.to_string(), value.to_string()]);
}
