use std::fmt::Write as _;

use bestiary_core::{
    CatalogEntity, CategorySummary, ErrorPresentation, PageSlot, RangeSummary, ReconciledPage,
    visible_pages,
};

pub fn entity_row(entity: &CatalogEntity, favorite: bool) -> String {
    format!(
        "{marker} {id:>5}  {name:<18} {category:<10} {status:<8} {score:>4}",
        marker = if favorite { '*' } else { ' ' },
        id = entity.id,
        name = entity.name,
        category = entity.category,
        status = entity.status(),
        score = entity.score,
    )
}

pub fn page(
    page: &ReconciledPage,
    page_size: u32,
    is_favorite: impl Fn(&CatalogEntity) -> bool,
) -> String {
    let mut out = String::new();
    if page.is_empty() {
        out.push_str("No creatures match the current filters.\n");
    }
    for entity in &page.items {
        let _ = writeln!(out, "{}", entity_row(entity, is_favorite(entity)));
    }
    if page.effective_total > 0 {
        let _ = writeln!(out, "\n{}", RangeSummary::for_page(page, page_size));
    }
    let pages = navigation(page.page, page.effective_page_count);
    if !pages.is_empty() {
        let _ = writeln!(out, "Pages: {pages}");
    }
    if page.approximate {
        out.push_str("(totals reflect the fetched page only)\n");
    }
    out
}

pub fn navigation(current: u32, total: u32) -> String {
    visible_pages(current, total)
        .into_iter()
        .map(|slot| match slot {
            PageSlot::Page(n) if n == current => format!("[{n}]"),
            PageSlot::Page(n) => n.to_string(),
            PageSlot::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn entity_detail(entity: &CatalogEntity, favorite: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{}){}", entity.name, entity.id, if favorite { " *" } else { "" });
    let _ = writeln!(out, "Category: {}", entity.category);
    let _ = writeln!(out, "Types:    {}", entity.types.join(", "));
    let _ = writeln!(out, "Status:   {} (score {})", entity.status(), entity.score);
    if !entity.abilities.is_empty() {
        let _ = writeln!(out, "Abilities: {}", entity.abilities.join(", "));
    }
    let stats = &entity.stats;
    let _ = writeln!(
        out,
        "Stats:    HP {} / Atk {} / Def {} / SpA {} / SpD {} / Spe {}",
        stats.hp,
        stats.attack,
        stats.defense,
        stats.special_attack,
        stats.special_defense,
        stats.speed
    );
    if let Some(url) = &entity.image_url {
        let _ = writeln!(out, "Image:    {url}");
    }
    let _ = writeln!(out, "\n{}", entity.description);
    out
}

pub fn categories(categories: &[CategorySummary]) -> String {
    let mut out = String::new();
    for category in categories {
        let _ = writeln!(out, "{:<10} {:>5}", category.display_name, category.entity_count);
    }
    out
}

pub fn failure(presentation: &ErrorPresentation) -> String {
    let mut out = format!("{}\n{}\n", presentation.title, presentation.message);
    let _ = writeln!(out, "Run the command again to {}.", presentation.retry_label.to_lowercase());
    out
}
