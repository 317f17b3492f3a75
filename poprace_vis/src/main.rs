//! Animated population bar chart race.
//!
//! Fetches the whole dataset once from the data daemon, then owns the
//! animation: an 800 ms year timer, continent filter buttons, play/pause,
//! and the per-frame redraw of ranked bars with 500 ms transitions.
//!
//! Server location comes from `POPRACE_SERVER` or `--server`.

use macroquad::prelude::*;
use tracing::info;

use poprace::dataset::{Continent, YearlyDataset, CONTINENTS};
use poprace::format;
use poprace::frame::{self, ChartGeometry, FramePlan};
use poprace::playback::RaceState;
use poprace::reconcile::BarReconciler;
use poprace::theme;

mod fetch;
mod flags;

use fetch::DatasetFetcher;
use flags::FlagCache;

// Space reserved above the chart for the title and controls.
const TOP_UI_H: f32 = 156.0;
const UI_GAP: f32 = 6.0;
const BTN_W: f32 = 110.0;
const BTN_H: f32 = 34.0;
const BTN_FONT_SIZE: f32 = 20.0;
const PLAY_BTN_R: f32 = 26.0;

const TITLE: &str = "Population growth per country, 1950 to 2021";
const TITLE_FONT_SIZE: f32 = 30.0;

const NAME_FONT_SIZE: f32 = 20.0;
const VALUE_FONT_SIZE: f32 = 18.0;
const TICK_FONT_SIZE: f32 = 14.0;
const YEAR_FONT_SIZE: f32 = 48.0;
const TOTAL_FONT_SIZE: f32 = 20.0;

const FLAG_W: f32 = 30.0;

#[derive(Debug, Clone)]
struct ServerConfig {
    base_url: String,
}

impl ServerConfig {
    fn from_env_and_args() -> Self {
        let mut base_url = std::env::var("POPRACE_SERVER")
            .unwrap_or_else(|_| "http://127.0.0.1:4310".to_string());

        let mut args = std::env::args().skip(1);
        while let Some(a) = args.next() {
            match a.as_str() {
                "--server" => {
                    if let Some(v) = args.next() {
                        base_url = v;
                    }
                }
                _ => {}
            }
        }

        // A trailing slash would double up in request paths.
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "poprace".to_owned(),
        window_width: 1100,
        window_height: (500.0 + TOP_UI_H) as i32,
        ..Default::default()
    }
}

fn rgb(c: theme::Rgb, alpha: f32) -> Color {
    Color::from_rgba(c[0], c[1], c[2], (alpha * 255.0) as u8)
}

fn continent_button(rect: Rect, continent: Continent, excluded: bool) -> bool {
    let (mx, my) = mouse_position();
    let hovered = rect.contains(vec2(mx, my));
    let clicked = hovered && is_mouse_button_pressed(MouseButton::Left);

    let alpha = if excluded { 0.5 } else { 1.0 };
    draw_rectangle(
        rect.x,
        rect.y,
        rect.w,
        rect.h,
        rgb(theme::continent_color(continent), alpha),
    );
    if hovered && !excluded {
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 2.0, DARKGRAY);
    }

    let label = continent.name();
    let dims = measure_text(label, None, BTN_FONT_SIZE as u16, 1.0);
    draw_text(
        label,
        rect.x + (rect.w - dims.width) * 0.5,
        rect.y + rect.h * 0.68,
        BTN_FONT_SIZE,
        WHITE,
    );

    clicked
}

fn play_button(center: Vec2, playing: bool) -> bool {
    let (mx, my) = mouse_position();
    let hovered = (vec2(mx, my) - center).length() <= PLAY_BTN_R;
    let clicked = hovered && is_mouse_button_pressed(MouseButton::Left);

    draw_circle(center.x, center.y, PLAY_BTN_R, rgb(theme::PLAY_BUTTON, 1.0));
    if playing {
        draw_triangle(
            vec2(center.x - 7.0, center.y - 10.0),
            vec2(center.x - 7.0, center.y + 10.0),
            vec2(center.x + 11.0, center.y),
            DARKGRAY,
        );
    } else {
        draw_rectangle(center.x - 10.0, center.y - 10.0, 7.0, 20.0, DARKGRAY);
        draw_rectangle(center.x + 3.0, center.y - 10.0, 7.0, 20.0, DARKGRAY);
    }

    clicked
}

fn draw_text_right(text: &str, right_x: f32, baseline_y: f32, font_size: f32, color: Color) {
    let dims = measure_text(text, None, font_size as u16, 1.0);
    draw_text(text, right_x - dims.width, baseline_y, font_size, color);
}

/// Draw a flag texture clamped to the plotting area. Both the destination
/// rect and the matching source rect shrink together, so partially visible
/// flags don't stretch.
fn draw_flag_clipped(
    tex: &Texture2D,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    clip: (f32, f32, f32, f32),
) {
    let (cx, cy, cw, ch) = clip;
    let x0 = x.max(cx);
    let y0 = y.max(cy);
    let x1 = (x + w).min(cx + cw);
    let y1 = (y + h).min(cy + ch);
    if x1 <= x0 || y1 <= y0 {
        return;
    }

    let source = Rect::new(
        (x0 - x) / w * tex.width(),
        (y0 - y) / h * tex.height(),
        (x1 - x0) / w * tex.width(),
        (y1 - y0) / h * tex.height(),
    );
    draw_texture_ex(
        tex,
        x0,
        y0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(x1 - x0, y1 - y0)),
            source: Some(source),
            ..Default::default()
        },
    );
}

struct App {
    dataset: YearlyDataset,
    years: Vec<String>,
    state: RaceState,
    plan: FramePlan,
    bars: BarReconciler,
    flags: FlagCache,
    last_width: f32,
}

impl App {
    fn new(dataset: YearlyDataset, flags: FlagCache) -> Self {
        let years: Vec<String> = dataset.year_keys().iter().map(|s| s.to_string()).collect();
        let state = RaceState::new(years.len());
        let geom = ChartGeometry::with_width(screen_width());
        let plan = frame::assemble(&years[0], dataset.records(&years[0]), &state.filter, &geom);
        let mut bars = BarReconciler::new();
        bars.apply(&plan);

        Self {
            dataset,
            years,
            state,
            plan,
            bars,
            flags,
            last_width: geom.width,
        }
    }

    fn rebuild_plan(&mut self, geom: &ChartGeometry) {
        let year = &self.years[self.state.year_index()];
        self.plan = frame::assemble(year, self.dataset.records(year), &self.state.filter, geom);
        self.bars.apply(&self.plan);
    }

    fn frame(&mut self) {
        let dt = get_frame_time();
        let mut dirty = false;

        // Continent filter row, centered under the title.
        let row_w = 5.0 * BTN_W + 4.0 * UI_GAP;
        let x0 = (screen_width() - row_w) * 0.5;
        let row_y = 46.0;
        for (i, continent) in CONTINENTS.iter().enumerate() {
            let rect = Rect::new(x0 + i as f32 * (BTN_W + UI_GAP), row_y, BTN_W, BTN_H);
            if continent_button(rect, *continent, self.state.filter.is_excluded(*continent)) {
                self.state.toggle_continent(*continent);
                dirty = true;
            }
        }

        // Play/pause disc.
        let play_center = vec2(screen_width() * 0.5, row_y + BTN_H + 10.0 + PLAY_BTN_R);
        if play_button(play_center, self.state.is_playing()) {
            self.state.toggle_play();
            dirty = true;
        }

        if self.state.advance(dt as f64) {
            dirty = true;
        }

        let geom = ChartGeometry::with_width(screen_width());
        if dirty || (geom.width - self.last_width).abs() > 0.5 {
            self.last_width = geom.width;
            self.rebuild_plan(&geom);
        }

        self.bars.advance(dt);
        self.flags.pump();
        self.draw_chart(&geom);
    }

    fn draw_chart(&mut self, geom: &ChartGeometry) {
        let top = TOP_UI_H;

        // Axis.
        let axis_y = top + self.plan.axis_y;
        draw_line(
            geom.margin_left,
            axis_y,
            geom.margin_left + geom.bar_max_width(),
            axis_y,
            1.0,
            GRAY,
        );
        for tick in &self.plan.axis {
            draw_line(tick.x, axis_y, tick.x, axis_y + 6.0, 1.0, GRAY);
            let dims = measure_text(&tick.label, None, TICK_FONT_SIZE as u16, 1.0);
            draw_text(
                &tick.label,
                tick.x - dims.width * 0.5,
                axis_y + 22.0,
                TICK_FONT_SIZE,
                DARKGRAY,
            );
        }

        // Bars with their name and value labels riding the same tweens.
        for (name, v) in self.bars.visuals() {
            let y = top + v.y.value();
            let w = v.width.value();
            let h = v.height.value();
            draw_rectangle(
                geom.margin_left,
                y,
                w,
                h,
                rgb(theme::continent_color(v.continent), 1.0),
            );

            draw_text_right(
                name,
                geom.margin_left - 10.0,
                y + h * 0.5 + NAME_FONT_SIZE * 0.35,
                NAME_FONT_SIZE,
                BLACK,
            );

            let value = format::group_thousands(v.population);
            draw_text(
                &value,
                geom.value_label_x(geom.margin_left + w),
                y + h * 0.5 + VALUE_FONT_SIZE * 0.35,
                VALUE_FONT_SIZE,
                DARKGRAY,
            );
        }

        // Flags are rebuilt from target geometry every frame, never tweened.
        let clip = {
            let (px, py, pw, ph) = geom.plot_rect();
            (px, top + py, pw, ph)
        };
        for bar in &self.plan.bars {
            self.flags.request(&bar.flag, FLAG_W, bar.height);
            if let Some(tex) = self.flags.get(&bar.flag) {
                draw_flag_clipped(
                    tex,
                    bar.right() - FLAG_W,
                    top + bar.y,
                    FLAG_W,
                    bar.height,
                    clip,
                );
            }
        }

        // Year watermark and the total of the displayed slice.
        let right_x = geom.width - geom.margin_right - 20.0;
        draw_text_right(
            &self.plan.year,
            right_x,
            top + geom.height - geom.margin_bottom - 60.0 - YEAR_FONT_SIZE,
            YEAR_FONT_SIZE,
            Color::new(0.0, 0.0, 0.0, 0.2),
        );
        draw_text_right(
            &format!("Total: {}", format::group_thousands(self.plan.total_population)),
            right_x,
            top + geom.height - geom.margin_bottom - 30.0 + 1.2 * TOTAL_FONT_SIZE,
            TOTAL_FONT_SIZE,
            BLACK,
        );
    }
}

enum Phase {
    Loading,
    Error(String),
    Ready(App),
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt::init();

    let cfg = ServerConfig::from_env_and_args();
    info!("fetching dataset from {}", cfg.base_url);

    let fetcher = DatasetFetcher::start(cfg.base_url.clone());
    let mut phase = Phase::Loading;

    loop {
        clear_background(WHITE);

        let title_dims = measure_text(TITLE, None, TITLE_FONT_SIZE as u16, 1.0);
        draw_text(
            TITLE,
            (screen_width() - title_dims.width) * 0.5,
            32.0,
            TITLE_FONT_SIZE,
            BLACK,
        );

        match &mut phase {
            Phase::Loading => {
                if let Some(res) = fetcher.poll_done() {
                    phase = match res {
                        Ok(data) if data.is_empty() => {
                            Phase::Error("dataset has no years".to_string())
                        }
                        Ok(data) => {
                            info!("dataset loaded: {} years", data.year_count());
                            Phase::Ready(App::new(data, FlagCache::new(cfg.base_url.clone())))
                        }
                        Err(e) => Phase::Error(e),
                    };
                } else {
                    draw_text(
                        "Loading...",
                        screen_width() * 0.5 - 50.0,
                        screen_height() * 0.5,
                        24.0,
                        DARKGRAY,
                    );
                }
            }
            Phase::Error(msg) => {
                let text = format!("Error: {msg}");
                let dims = measure_text(&text, None, 24, 1.0);
                draw_text(
                    &text,
                    (screen_width() - dims.width) * 0.5,
                    screen_height() * 0.5,
                    24.0,
                    RED,
                );
            }
            Phase::Ready(app) => app.frame(),
        }

        next_frame().await;
    }
}
