use ratatui::{
    prelude::*,
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row,
        Table, Wrap,
    },
};
use scraps_core::{model::Category, ports::AnimationMeta};

use crate::app::{App, Field, Focus, Page, Status};
use crate::content;

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, body_area, status_area] = chunks else {
        return;
    };

    // Title / header
    let header = Paragraph::new(vec![
        Line::from(content::TAGLINE).style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(animation_line(app.animation.as_ref())),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(content::APP_TITLE),
    );
    frame.render_widget(header, *header_area);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(0)])
        .split(*body_area);
    let [menu_area, content_area] = body_chunks.as_ref() else {
        return;
    };

    draw_menu(frame, app, *menu_area);

    // Main page
    match app.page {
        Page::Home => draw_home(frame, app, *content_area),
        Page::LogWaste => draw_log_waste(frame, app, *content_area),
        Page::Analytics => draw_analytics(frame, app, *content_area),
        Page::Tips => draw_tips(frame, *content_area),
        Page::Donations => draw_donations(frame, *content_area),
    }

    // Status bar
    let nav_hint = match app.focus {
        Focus::Menu if app.page == Page::LogWaste => {
            "↑/↓ or 1-5 switch page · Enter open form · q/Ctrl-C quit"
        }
        Focus::Menu => "↑/↓ or 1-5 switch page · q/Ctrl-C quit",
        Focus::Form => "Tab/↑/↓ next field · ←/→ category · Enter log · Esc back · Ctrl-C quit",
    };

    let (status_text, status_style) = match &app.status {
        Some(Status::Success(msg)) => (format!("{msg} · {nav_hint}"), Style::default().fg(Color::Green)),
        Some(Status::Error(msg)) => (format!("{msg} · {nav_hint}"), Style::default().fg(Color::Red)),
        None => (nav_hint.to_owned(), Style::default()),
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn animation_line(meta: Option<&AnimationMeta>) -> String {
    let Some(meta) = meta else {
        return String::new();
    };
    let mut parts = vec![meta.name.clone().unwrap_or_else(|| "animation".to_owned())];
    if let (Some(width), Some(height)) = (meta.width, meta.height) {
        parts.push(format!("{width}×{height}"));
    }
    if let Some(secs) = meta.duration_secs() {
        parts.push(format!("{secs:.1}s"));
    }
    format!("♪ {}", parts.join(" · "))
}

fn draw_menu(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = Page::ALL
        .iter()
        .enumerate()
        .map(|(idx, page)| ListItem::new(format!("{} {}", idx + 1, page.title())))
        .collect::<Vec<ListItem<'_>>>();

    let border_style = if app.focus == Focus::Menu {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Navigation"),
        )
        .highlight_symbol("> ")
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    state.select(Some(app.page.index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_home(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(content::WELCOME).style(Style::default().add_modifier(Modifier::BOLD)),
        Line::default(),
        Line::from(content::INTRO),
        Line::default(),
    ];
    lines.extend(content::WELCOME_BODY.into_iter().map(Line::from));
    lines.push(Line::default());
    lines.push(Line::from(format!(
        "Entries logged: {} · Total wasted: {}g · Storage: {}",
        app.service.len(),
        app.service.total_grams(),
        app.storage_label
    )));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(Page::Home.title()))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_log_waste(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // intro
            Constraint::Length(3), // food item
            Constraint::Length(3), // category
            Constraint::Length(3), // amount
            Constraint::Min(0),    // recent entries
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [intro_area, item_area, category_area, amount_area, recent_area] = chunks else {
        return;
    };

    let intro = Paragraph::new("Enter the food items you have wasted today.")
        .style(Style::default().add_modifier(Modifier::ITALIC));
    frame.render_widget(intro, *intro_area);

    let form = &app.form;
    let editing = app.focus == Focus::Form;

    let field_block = |field: Field, title: &'static str| {
        let style = if editing && form.field == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(title)
    };

    frame.render_widget(
        Paragraph::new(form.food_item.as_str()).block(field_block(Field::FoodItem, "Food Item")),
        *item_area,
    );

    let categories = Category::ALL
        .iter()
        .map(|category| {
            if *category == form.category() {
                Span::styled(
                    format!("[{category}]"),
                    Style::default().add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(format!(" {category} "))
            }
        })
        .collect::<Vec<Span<'_>>>();
    frame.render_widget(
        Paragraph::new(Line::from(categories)).block(field_block(Field::Category, "Category")),
        *category_area,
    );

    frame.render_widget(
        Paragraph::new(form.amount.as_str())
            .block(field_block(Field::Amount, "Amount Wasted (in grams)")),
        *amount_area,
    );

    let recent = app.service.recent(10);
    let items = if recent.is_empty() {
        vec![ListItem::new("Nothing logged yet.")]
    } else {
        recent
            .iter()
            .map(|record| {
                let entry = &record.entry;
                ListItem::new(format!(
                    "{} {} · {}g · {} · {}",
                    record.id,
                    entry.food_item(),
                    entry.amount_grams(),
                    entry.category(),
                    entry.logged_at().format("%d.%m.%Y %H:%M UTC")
                ))
            })
            .collect()
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Recently logged"),
    );
    frame.render_widget(list, *recent_area);
}

fn draw_analytics(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [chart_area, trend_area] = chunks else {
        return;
    };

    let summary = app.service.summary();
    let bars = summary
        .iter()
        .map(|row| {
            Bar::default()
                .value(row.total_grams)
                .label(Line::from(row.category.label()))
                .text_value(format!("{}g", row.total_grams))
                .style(Style::default().fg(category_color(row.category)))
        })
        .collect::<Vec<Bar<'_>>>();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Amount (g) by category · total {}g", app.service.total_grams())),
        )
        .bar_width(16)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, *chart_area);

    let trend = app.service.daily_trend();
    let title = "Over time";
    if trend.is_empty() {
        let paragraph = Paragraph::new("Log some waste to see how it adds up over time.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, *trend_area);
        return;
    }

    let rows = trend.iter().rev().map(|day| {
        Row::new(vec![
            Cell::from(day.date.format("%d.%m.%Y").to_string()),
            Cell::from(format!("{}g", day.total_grams)),
        ])
    });
    let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(8)])
        .header(Row::new(vec!["Date (UTC)", "Wasted"]).style(Style::default().add_modifier(Modifier::BOLD)))
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);
    frame.render_widget(table, *trend_area);
}

fn draw_tips(frame: &mut Frame<'_>, area: Rect) {
    let mut lines = vec![
        Line::from("Here are some easy tips to reduce food waste:"),
        Line::default(),
    ];
    lines.extend(content::TIPS.into_iter().map(|tip| Line::from(format!("- {tip}"))));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(Page::Tips.title()))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_donations(frame: &mut Frame<'_>, area: Rect) {
    let mut lines: Vec<Line<'_>> = content::DONATION_INTRO.into_iter().map(Line::from).collect();
    lines.push(Line::default());
    lines.push(Line::from("Nearby Donation Centers:").style(Style::default().add_modifier(Modifier::BOLD)));
    lines.extend(
        content::DONATION_CENTERS
            .into_iter()
            .map(|center| Line::from(format!("- {center}"))),
    );

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Donate Unused Food to Local Charities"),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn category_color(category: Category) -> Color {
    match category {
        Category::FruitsVeggies => Color::Green,
        Category::Dairy => Color::White,
        Category::Meat => Color::Red,
        Category::Grains => Color::Yellow,
        Category::Other => Color::Magenta,
    }
}
