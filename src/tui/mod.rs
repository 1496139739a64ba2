//! Ratatui-based terminal dashboard.
//!
//! Three views share one control panel (price range + zipcode):
//! - **Map**: recommended houses in the price range, coloured by price
//! - **Recommended**: investment, expected return and the filtered table
//! - **Analytics**: price distributions and averages for one zipcode

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs},
};
use tracing::info;

use crate::app::pipeline::{PipelineOutput, run_pipeline};
use crate::domain::DashboardConfig;
use crate::error::AppError;
use crate::math::Histogram;
use crate::report::{DashboardView, RECOMMENDATION_COLUMNS, Selection, fmt_money};

mod plotters_chart;

use plotters_chart::{BarsChart, MapChart};

/// Columns shown in the recommendation table (a prefix of `RECOMMENDATION_COLUMNS`).
const TABLE_COLUMNS: usize = 12;
const TABLE_WIDTHS: [u16; TABLE_COLUMNS] = [11, 10, 11, 16, 15, 16, 7, 9, 5, 8, 9, 11];
const PAGE_ROWS: usize = 10;

const BAR_COLOR: RGBColor = RGBColor(64, 160, 255);

/// Start the TUI.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    // Load before taking over the terminal so ingest errors print normally.
    let output = run_pipeline(&config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, output);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Map,
    Recommended,
    Analytics,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Map, Tab::Recommended, Tab::Analytics];

    fn title(self) -> &'static str {
        match self {
            Tab::Map => "Map",
            Tab::Recommended => "Recommended",
            Tab::Analytics => "Analytics",
        }
    }

    fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn prev(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Control panel rows, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    LowPrice,
    HighPrice,
    Zipcode,
}

impl Control {
    const ALL: [Control; 3] = [Control::LowPrice, Control::HighPrice, Control::Zipcode];
}

struct App {
    config: DashboardConfig,
    output: PipelineOutput,
    selection: Selection,
    view: DashboardView,
    tab: Tab,
    selected_control: usize,
    table: TableState,
    status: String,
}

impl App {
    fn new(config: DashboardConfig, output: PipelineOutput) -> Self {
        let selection = crate::app::initial_selection(&config);
        let view = output.view(&selection);
        let status = format!(
            "Loaded {} listings, {} recommended.",
            output.summary.listings, output.summary.buys
        );
        let mut app = Self {
            config,
            output,
            selection,
            view,
            tab: Tab::Map,
            selected_control: 0,
            table: TableState::default(),
            status,
        };
        app.refresh_view();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Up => {
                self.selected_control = self.selected_control.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_control + 1 < Control::ALL.len() {
                    self.selected_control += 1;
                }
            }
            KeyCode::Left => self.adjust_control(-1),
            KeyCode::Right => self.adjust_control(1),
            KeyCode::Char('j') => self.scroll_table(1),
            KeyCode::Char('k') => self.scroll_table(-1),
            KeyCode::PageDown => self.scroll_table(PAGE_ROWS as i64),
            KeyCode::PageUp => self.scroll_table(-(PAGE_ROWS as i64)),
            KeyCode::Char('r') => self.reload()?,
            _ => {}
        }

        Ok(false)
    }

    fn adjust_control(&mut self, direction: i64) {
        let step = i64::from(self.config.price_step_k) * direction;
        match Control::ALL[self.selected_control] {
            Control::LowPrice | Control::HighPrice => {
                let (Some(bounds), Some(range)) = (self.view.bounds, self.view.range) else {
                    self.status = "No recommended houses to filter.".to_string();
                    return;
                };
                let range = if Control::ALL[self.selected_control] == Control::LowPrice {
                    range.shift_low(step, bounds)
                } else {
                    range.shift_high(step, bounds)
                };
                self.selection.price = Some(range);
                self.refresh_view();
                self.status = crate::report::format_price_range(range);
            }
            Control::Zipcode => {
                let zips = &self.view.zipcodes;
                if zips.is_empty() {
                    return;
                }
                let current = self
                    .view
                    .zipcode
                    .and_then(|z| zips.iter().position(|&x| x == z))
                    .unwrap_or(0) as i64;
                let next = (current + direction).rem_euclid(zips.len() as i64) as usize;
                let zipcode = zips[next];
                self.selection.zipcode = Some(zipcode);
                self.refresh_view();
                self.status = format!("zipcode: {zipcode}");
            }
        }
    }

    fn scroll_table(&mut self, delta: i64) {
        let len = self.view.filtered.len();
        if len == 0 {
            self.table.select(None);
            return;
        }
        let current = self.table.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, len as i64 - 1) as usize;
        self.table.select(Some(next));
    }

    /// Re-read the CSV and rerun every stage, keeping the current selection.
    fn reload(&mut self) -> Result<(), AppError> {
        let output = run_pipeline(&self.config)?;
        info!(listings = output.summary.listings, "reloaded dataset");
        self.status = format!(
            "Reloaded {}: {} listings, {} recommended.",
            output.source.display(),
            output.summary.listings,
            output.summary.buys
        );
        self.output = output;
        self.refresh_view();
        Ok(())
    }

    /// Rebuild the view from the pipeline output for the current selection.
    fn refresh_view(&mut self) {
        self.view = self.output.view(&self.selection);
        // Keep the selection in sync with what the view clamped it to.
        self.selection.price = self.view.range;
        self.selection.zipcode = self.view.zipcode;

        let len = self.view.filtered.len();
        match self.table.selected() {
            _ if len == 0 => self.table.select(None),
            Some(i) if i >= len => self.table.select(Some(len - 1)),
            None => self.table.select(Some(0)),
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(5),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);
        match self.tab {
            Tab::Map => self.draw_map(frame, chunks[2]),
            Tab::Recommended => self.draw_recommended(frame, chunks[2]),
            Tab::Analytics => self.draw_analytics(frame, chunks[2]),
        }
        self.draw_controls(frame, chunks[3]);
        self.draw_footer(frame, chunks[4]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("Houses recommendation", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | {}", self.output.source.display())),
        ]));

        let range = self
            .view
            .range
            .map(|r| format!("${}..${}", fmt_money(r.low()), fmt_money(r.high())))
            .unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(Span::styled(
            format!(
                "listings: {} | zipcodes: {} | recommended: {} | range: {range} | in range: {}",
                self.output.summary.listings,
                self.output.summary.zipcodes,
                self.view.recommended,
                self.view.filtered.len(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_map(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Map").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.view.filtered.is_empty() {
            render_placeholder(frame, inner, "No recommended houses in the selected price range.");
            return;
        }

        let (points, x_bounds, y_bounds, price_bounds) = map_series(&self.view);
        let (chart_rect, insets) = chart_layout(inner);
        let widget = MapChart {
            points: &points,
            x_bounds,
            y_bounds,
            price_bounds,
        };
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds, ("longitude", "lat"));
        }
    }

    fn draw_recommended(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let totals = crate::report::format_totals(&self.view.totals);
        let p = Paragraph::new(totals)
            .style(Style::default().fg(Color::Green))
            .block(Block::default().title("Totals").borders(Borders::ALL));
        frame.render_widget(p, chunks[0]);

        let header = Row::new(
            RECOMMENDATION_COLUMNS[..TABLE_COLUMNS]
                .iter()
                .map(|name| Cell::from(*name)),
        )
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

        let rows = self.view.filtered.iter().map(|r| {
            let cells = r.cells();
            Row::new(cells.into_iter().take(TABLE_COLUMNS).map(Cell::from))
        });

        let widths = TABLE_WIDTHS.map(Constraint::Length);
        let title = format!("Recommended houses ({})", self.view.filtered.len());
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().title(title).borders(Borders::ALL))
            .row_highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        frame.render_stateful_widget(table, chunks[1], &mut self.table);
    }

    fn draw_analytics(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(analytics) = &self.view.analytics else {
            render_placeholder(frame, area, "No zipcodes loaded.");
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let mean = analytics
            .mean_price_k
            .map(|m| format!("${} k", fmt_money(m)))
            .unwrap_or_else(|| "-".to_string());
        let summary = Paragraph::new(format!(
            "Zipcode {} | listings: {} | Average price {mean}",
            analytics.zipcode, analytics.listings
        ))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(summary, chunks[0]);

        let top = split_columns(chunks[1]);
        let bottom = split_columns(chunks[2]);

        draw_histogram(frame, top[0], "Price", analytics.price_hist_k.as_ref(), "price ($ thousand)");
        draw_histogram(
            frame,
            top[1],
            "Price / living sqft",
            analytics.price_per_sqft_hist.as_ref(),
            "price / living sqft ($)",
        );

        let bedrooms: Vec<(f64, f64)> = analytics
            .by_bedrooms
            .iter()
            .map(|&(k, v)| (f64::from(k), v))
            .collect();
        draw_category_bars(frame, bottom[0], "Average price by bedrooms", &bedrooms, 1.0, "bedrooms");
        draw_category_bars(frame, bottom[1], "Average price by floors", &analytics.by_floors, 0.5, "floors");
    }

    fn draw_controls(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (low, high) = match self.view.range {
            Some(r) => (r.low_k.to_string(), r.high_k.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        let bounds = self
            .view
            .bounds
            .map(|b| format!(" (bounds {}..{})", b.min_k, b.max_k))
            .unwrap_or_default();
        let zipcode = self
            .view
            .zipcode
            .map(|z| z.to_string())
            .unwrap_or_else(|| "-".to_string());

        let items = vec![
            ListItem::new(format!("Low price (x 1000): {low}{bounds}")),
            ListItem::new(format!("High price (x 1000): {high}")),
            ListItem::new(format!("Zipcode: {zipcode} ({} available)", self.view.zipcodes.len())),
        ];

        let list = List::new(items)
            .block(Block::default().title("Controls").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_control));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab view  ↑/↓ select  ←/→ adjust  j/k PgUp/PgDn scroll  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn render_placeholder(frame: &mut ratatui::Frame<'_>, area: Rect, msg: &str) {
    let p = Paragraph::new(msg.to_string()).style(Style::default().fg(Color::Yellow));
    frame.render_widget(p, area);
}

fn split_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area)
}

fn draw_histogram(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    hist: Option<&Histogram>,
    x_label: &'static str,
) {
    let title = match hist {
        Some(h) => format!("{title} (n = {})", h.total()),
        None => title.to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(hist) = hist else {
        render_placeholder(frame, inner, "No data.");
        return;
    };

    let bars: Vec<(f64, f64, f64)> = hist.bins().map(|(lo, hi, c)| (lo, hi, c as f64)).collect();
    let widget = BarsChart {
        bars: &bars,
        x_bounds: hist.range(),
        y_max: hist.max_count() as f64,
        x_label,
        y_label: "count",
        fmt_x: fmt_axis_x,
        color: BAR_COLOR,
    };
    frame.render_widget(widget, inner);
}

/// Bars centred on each category value; `spacing` is the gap between adjacent categories.
fn draw_category_bars(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    values: &[(f64, f64)],
    spacing: f64,
    x_label: &'static str,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (Some(first), Some(last)) = (values.first(), values.last()) else {
        render_placeholder(frame, inner, "No data.");
        return;
    };

    let half = spacing * 0.4;
    let bars: Vec<(f64, f64, f64)> = values.iter().map(|&(k, v)| (k - half, k + half, v)).collect();
    let y_max = values.iter().map(|v| v.1).fold(0.0, f64::max);

    let widget = BarsChart {
        bars: &bars,
        x_bounds: [first.0 - spacing, last.0 + spacing],
        y_max,
        x_label,
        y_label: "avg price ($ k)",
        fmt_x: fmt_axis_x,
        color: BAR_COLOR,
    };
    frame.render_widget(widget, inner);
}

/// Build the map series: `(long, lat, price)` points plus padded bounds.
fn map_series(view: &DashboardView) -> (Vec<(f64, f64, f64)>, [f64; 2], [f64; 2], [f64; 2]) {
    let points: Vec<(f64, f64, f64)> = view
        .filtered
        .iter()
        .filter(|r| r.long.is_finite() && r.lat.is_finite())
        .map(|r| (r.long, r.lat, r.price))
        .collect();

    let x_bounds = padded_bounds(points.iter().map(|p| p.0));
    let y_bounds = padded_bounds(points.iter().map(|p| p.1));
    let price_bounds = view
        .range
        .map(|r| [r.low(), r.high()])
        .unwrap_or([0.0, 1.0]);

    (points, x_bounds, y_bounds, price_bounds)
}

fn padded_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    let pad = ((hi - lo).abs() * 0.05).max(1e-3);
    [lo - pad, hi + pad]
}

fn fmt_axis_x(v: f64) -> String {
    format!("{v:.1}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    labels: (&str, &str),
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("{x_val:.2}");
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.2}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(labels.0.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(labels.1.to_string())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{analyze, raw};
    use crate::report::{PriceRange, build_view};

    use std::io::Write;

    const PRICES: [f64; 5] = [180_500.0, 260_000.0, 400_000.0, 520_000.0, 610_000.0];

    fn csv_line(id: u64, zipcode: u32, price: f64, month: u32) -> String {
        format!(
            "{id},2014{month:02}13T000000,{price},3,1,1180,5650,1,0,0,4,8,1180,0,1955,0,{zipcode},47.5112,-122.257,1340,5650"
        )
    }

    /// Three zipcodes (98001, 98004, 98103); recommended prices span 180..521 thousand.
    fn sales_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for (i, price) in PRICES.into_iter().enumerate() {
            let i = i as u64;
            writeln!(file, "{}", csv_line(1 + i, 98001, price, i as u32 + 1)).unwrap();
            writeln!(file, "{}", csv_line(10 + i, 98103, price * 1.5, 6)).unwrap();
            writeln!(file, "{}", csv_line(20 + i, 98004, price * 2.0, 9)).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn app_for(file: &tempfile::NamedTempFile) -> App {
        let config = DashboardConfig {
            data_path: file.path().to_path_buf(),
            price_low_k: None,
            price_high_k: None,
            zipcode: None,
            price_step_k: 10,
            table_limit: None,
        };
        let output = run_pipeline(&config).unwrap();
        App::new(config, output)
    }

    fn press(app: &mut App, code: KeyCode, times: usize) {
        for _ in 0..times {
            assert!(!app.handle_key(code).unwrap());
        }
    }

    #[test]
    fn zipcode_control_wraps_both_ways() {
        let file = sales_file();
        let mut app = app_for(&file);
        assert_eq!(app.view.zipcodes, vec![98001, 98004, 98103]);
        assert_eq!(app.view.zipcode, Some(98001));

        press(&mut app, KeyCode::Down, 2);
        press(&mut app, KeyCode::Left, 1);
        assert_eq!(app.view.zipcode, Some(98103));
        assert_eq!(app.selection.zipcode, Some(98103));
        assert_eq!(app.view.analytics.as_ref().map(|a| a.zipcode), Some(98103));

        press(&mut app, KeyCode::Right, 1);
        assert_eq!(app.view.zipcode, Some(98001));
        press(&mut app, KeyCode::Right, 1);
        assert_eq!(app.view.zipcode, Some(98004));
    }

    #[test]
    fn low_price_never_passes_high_price() {
        let file = sales_file();
        let mut app = app_for(&file);
        assert_eq!(app.view.range, Some(PriceRange { low_k: 180, high_k: 521 }));

        press(&mut app, KeyCode::Right, 1);
        assert_eq!(app.view.range.map(|r| r.low_k), Some(190));

        press(&mut app, KeyCode::Right, 100);
        let range = app.view.range.unwrap();
        assert_eq!(range, PriceRange { low_k: 521, high_k: 521 });
        assert_eq!(app.selection.price, app.view.range);
        assert!(app.view.filtered.is_empty());

        press(&mut app, KeyCode::Left, 1);
        press(&mut app, KeyCode::Down, 1);
        press(&mut app, KeyCode::Left, 100);
        let range = app.view.range.unwrap();
        assert_eq!(range, PriceRange { low_k: 511, high_k: 511 });
        assert_eq!(app.selection.price, app.view.range);
    }

    #[test]
    fn reload_reruns_pipeline_and_keeps_selection() {
        let file = sales_file();
        let mut app = app_for(&file);

        press(&mut app, KeyCode::Right, 1);
        press(&mut app, KeyCode::Down, 2);
        press(&mut app, KeyCode::Left, 1);
        let before = app.selection;
        assert_eq!(before.zipcode, Some(98103));

        // A cheaper 98001 sale lowers the slider floor after reload.
        let mut f = std::fs::OpenOptions::new().append(true).open(file.path()).unwrap();
        writeln!(f, "{}", csv_line(99, 98001, 100_000.0, 7)).unwrap();
        f.flush().unwrap();

        press(&mut app, KeyCode::Char('r'), 1);
        assert_eq!(app.output.summary.listings, 16);
        assert_eq!(app.view.bounds.map(|b| b.min_k), Some(100));
        assert_eq!(app.selection, before);
        assert_eq!(app.view.range, Some(PriceRange { low_k: 190, high_k: 521 }));
        assert_eq!(app.view.zipcode, Some(98103));
    }

    #[test]
    fn quit_keys_end_the_loop() {
        let file = sales_file();
        let mut app = app_for(&file);
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
        assert!(app.handle_key(KeyCode::Esc).unwrap());
    }

    #[test]
    fn tabs_cycle_both_ways() {
        assert_eq!(Tab::Map.next(), Tab::Recommended);
        assert_eq!(Tab::Analytics.next(), Tab::Map);
        assert_eq!(Tab::Map.prev(), Tab::Analytics);
    }

    #[test]
    fn padded_bounds_handles_single_point_and_empty() {
        let b = padded_bounds([47.5].into_iter());
        assert!(b[0] < 47.5 && b[1] > 47.5);
        assert_eq!(padded_bounds(std::iter::empty()), [0.0, 1.0]);
    }

    #[test]
    fn map_series_uses_filtered_rows() {
        let listings = analyze(vec![
            raw(1, 98001, 100_000.0, 1),
            raw(2, 98001, 200_000.0, 2),
            raw(3, 98001, 900_000.0, 3),
            raw(4, 98001, 950_000.0, 4),
        ]);
        let view = build_view(&listings, &Selection::default());
        assert_eq!(view.filtered.len(), 2);
        let (points, x, y, price) = map_series(&view);
        assert_eq!(points.len(), view.filtered.len());
        assert!(x[0] < x[1] && y[0] < y[1]);
        assert_eq!(price, [100_000.0, 201_000.0]);
    }

    #[test]
    fn chart_layout_skips_insets_when_small() {
        let (rect, insets) = chart_layout(Rect::new(0, 0, 15, 6));
        assert!(insets.is_none());
        assert_eq!(rect, Rect::new(0, 0, 15, 6));
    }
}
