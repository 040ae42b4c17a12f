//! Rendering. Pure functions from display state to ratatui widgets.

use crate::{
    app::{price_cell, App, View},
    login::{Field, LoginForm},
};
use aggregator_data::{ExchangeId, Symbol, REALTIME_CAPACITY, WEEKLY_DAYS};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span, Text},
    widgets::{Axis, Block, BorderType, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

const BG: Color = Color::Rgb(15, 15, 25);
const TEXT: Color = Color::Rgb(200, 200, 220);
const MUTED: Color = Color::Rgb(128, 128, 150);
const ACCENT: Color = Color::Rgb(255, 215, 0);
const GOOD: Color = Color::Rgb(0, 255, 127);
const BAD: Color = Color::Rgb(255, 69, 58);

fn exchange_color(exchange: ExchangeId) -> Color {
    match exchange {
        ExchangeId::Bybit => Color::Rgb(255, 169, 77),
        ExchangeId::Mexc => Color::Rgb(0, 182, 122),
        ExchangeId::Binance => Color::Rgb(240, 185, 11),
    }
}

fn bordered(title: impl Into<String>, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title_top(
            Line::from(Span::styled(
                format!(" {} ", title.into()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
        )
        .style(Style::default().bg(BG))
}

fn waiting(block: Block<'static>) -> Paragraph<'static> {
    Paragraph::new(Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Waiting for data...",
            Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        )),
    ]))
    .block(block)
    .alignment(Alignment::Center)
}

pub fn render_login(f: &mut Frame, form: &LoginForm) {
    let area = f.area();
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(10),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(46),
            Constraint::Min(0),
        ])
        .split(vertical[1]);
    let box_area = horizontal[1];

    let field_style = |field: Field| {
        if form.field == field {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT)
        }
    };
    let masked: String = "*".repeat(form.password.chars().count());

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Username: ", field_style(Field::Username)),
            Span::styled(form.username.clone(), Style::default().fg(Color::White)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Password: ", field_style(Field::Password)),
            Span::styled(masked, Style::default().fg(Color::White)),
        ]),
        Line::from(""),
    ];
    if let Some(error) = form.error {
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(BAD),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "  [Tab] Switch  [Enter] Sign in  [Esc] Quit",
        Style::default().fg(MUTED),
    )));

    let paragraph =
        Paragraph::new(lines).block(bordered("CRYPTO DASHBOARD - SIGN IN", Color::Rgb(138, 43, 226)));
    f.render_widget(paragraph, box_area);
}

pub fn render_dashboard(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(f.area());

    render_status_bar(f, chunks[0], app);
    render_banner(f, chunks[1], app);

    match app.view {
        View::Prices => render_price_table(f, chunks[2], app),
        View::Charts => render_charts(f, chunks[2], app),
        View::Overview => render_overview(f, chunks[2], app),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let updated = match app.last_update {
        Some(time) => time.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} / USDT ", app.symbol),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", app.view.title()),
            Style::default().fg(Color::Rgb(100, 149, 237)),
        ),
        Span::styled(format!(" Updated {updated} "), Style::default().fg(MUTED)),
        Span::styled(
            " [Tab] View  [<-/->] Symbol  [R] Refresh  [S] Save  [Q] Quit ",
            Style::default().fg(MUTED),
        ),
    ];
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(
            format!(" {notice} "),
            Style::default().fg(GOOD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Rgb(138, 43, 226)))
                .style(Style::default().bg(Color::Rgb(18, 18, 28))),
        )
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_banner(f: &mut Frame, area: Rect, app: &App) {
    let banner = app.best_banner();
    let color = if app.best.is_some() {
        GOOD
    } else if app.best_reported {
        BAD
    } else {
        MUTED
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(
        banner,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(BG)),
    )
    .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_price_table(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(
        ["Exchange", "Last", "Ask", "Bid", "Spread", "Spread %"]
            .into_iter()
            .map(|cell| Cell::from(Span::styled(cell, Style::default().fg(MUTED)))),
    )
    .height(1);

    let rows = ExchangeId::ALL.iter().map(|&exchange| {
        let quote = app.quote(exchange);
        let (spread_abs, spread_pct) = match quote.spread() {
            Some(spread) => (
                format!("{:.4}", spread.absolute),
                format!("{:.3}%", spread.percent),
            ),
            None => ("Error".to_string(), "Error".to_string()),
        };
        let cell = |text: String| {
            let style = if text == "Error" {
                Style::default().fg(BAD)
            } else {
                Style::default().fg(TEXT)
            };
            Cell::from(Span::styled(text, style))
        };

        Row::new(vec![
            Cell::from(Span::styled(
                exchange.as_str(),
                Style::default()
                    .fg(exchange_color(exchange))
                    .add_modifier(Modifier::BOLD),
            )),
            cell(price_cell(quote.last)),
            cell(price_cell(quote.ask)),
            cell(price_cell(quote.bid)),
            cell(spread_abs),
            cell(spread_pct),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(bordered(
        format!("{} QUOTES", app.symbol),
        Color::Rgb(100, 255, 218),
    ));
    f.render_widget(table, area);
}

fn render_charts(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_realtime_chart(f, chunks[0], app);
    render_weekly_chart(f, chunks[1], app);
}

fn render_realtime_chart(f: &mut Frame, area: Rect, app: &App) {
    let block = bordered(format!("{} REALTIME", app.symbol), Color::Rgb(100, 149, 237));
    if app.realtime.iter().all(Vec::is_empty) {
        f.render_widget(waiting(block), area);
        return;
    }

    let series: Vec<(ExchangeId, Vec<(f64, f64)>)> = ExchangeId::ALL
        .iter()
        .map(|&exchange| {
            let points = app.realtime[exchange.index()]
                .iter()
                .enumerate()
                .map(|(i, point)| (i as f64, point.price))
                .collect();
            (exchange, points)
        })
        .collect();

    let datasets = series
        .iter()
        .filter(|(_, points)| !points.is_empty())
        .map(|(exchange, points)| {
            Dataset::default()
                .name(exchange.as_str())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(exchange_color(*exchange)))
                .data(points)
        })
        .collect();

    let prices = series.iter().flat_map(|(_, points)| points.iter().map(|(_, y)| *y));
    let (min, max) = price_bounds(prices);

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(MUTED))
                .bounds([0.0, (REALTIME_CAPACITY - 1) as f64]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(MUTED))
                .bounds([min, max])
                .labels(vec![
                    Span::styled(format!("{min:.2}"), Style::default().fg(MUTED)),
                    Span::styled(format!("{max:.2}"), Style::default().fg(MUTED)),
                ]),
        );
    f.render_widget(chart, area);
}

fn render_weekly_chart(f: &mut Frame, area: Rect, app: &App) {
    let block = bordered(format!("{} LAST 7 DAYS", app.symbol), Color::Rgb(255, 105, 180));
    if app.weekly.iter().all(Option::is_none) {
        f.render_widget(waiting(block), area);
        return;
    }

    let series: Vec<(ExchangeId, Vec<(f64, f64)>)> = app
        .weekly
        .iter()
        .flatten()
        .map(|weekly| {
            let points = weekly
                .closes
                .iter()
                .enumerate()
                .map(|(i, close)| (i as f64, *close))
                .collect();
            (weekly.exchange, points)
        })
        .collect();

    let datasets = series
        .iter()
        .map(|(exchange, points)| {
            Dataset::default()
                .name(exchange.as_str())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(exchange_color(*exchange)))
                .data(points)
        })
        .collect();

    let closes = series.iter().flat_map(|(_, points)| points.iter().map(|(_, y)| *y));
    let (min, max) = price_bounds(closes);

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(MUTED))
                .bounds([0.0, (WEEKLY_DAYS - 1) as f64])
                .labels(vec![
                    Span::styled("6d ago", Style::default().fg(MUTED)),
                    Span::styled("today", Style::default().fg(MUTED)),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(MUTED))
                .bounds([min, max])
                .labels(vec![
                    Span::styled(format!("{min:.2}"), Style::default().fg(MUTED)),
                    Span::styled(format!("{max:.2}"), Style::default().fg(MUTED)),
                ]),
        );
    f.render_widget(chart, area);
}

fn render_overview(f: &mut Frame, area: Rect, app: &App) {
    let mut header_cells = vec![Cell::from(Span::styled("Symbol", Style::default().fg(MUTED)))];
    header_cells.extend(ExchangeId::ALL.iter().map(|&exchange| {
        Cell::from(Span::styled(
            exchange.as_str(),
            Style::default().fg(exchange_color(exchange)),
        ))
    }));
    let header = Row::new(header_cells).height(1);

    let rows = Symbol::ALL.iter().map(|&symbol| {
        let name_style = if symbol == app.symbol {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT)
        };

        let mut cells = vec![Cell::from(Span::styled(symbol.as_str(), name_style))];
        cells.extend(app.overview[symbol.index()].iter().map(|price| {
            let text = price_cell(*price);
            let style = if price.is_none() {
                Style::default().fg(BAD)
            } else {
                Style::default().fg(TEXT)
            };
            Cell::from(Span::styled(text, style))
        }));
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(bordered("ALL SYMBOLS", Color::Rgb(100, 255, 218)));
    f.render_widget(table, area);
}

/// Y-axis bounds with a little headroom; a flat series still gets a
/// non-zero range so the line stays visible.
fn price_bounds(prices: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for price in prices {
        min = min.min(price);
        max = max.max(price);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * 0.05).max(max.abs() * 0.0005).max(f64::EPSILON);
    (min - pad, max + pad)
}
