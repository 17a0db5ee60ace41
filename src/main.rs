/// Entry point and UI loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use config::{AppConfig, TimingConfig};
use domain::action::Action;
use domain::coin::{AccountSnapshot, PerpContract};
use domain::mock;
use error::AppError;
use sim::advisory::AdvisoryService;
use sim::controller::Controller;
use sim::effect::Effect;
use sim::order::{MockExchange, OrderSink};
use sim::toast::Toast;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::rain::DigitalRain;
use ui::renderer::{Renderer, Scene, SCREEN_H, SCREEN_W};
use ui::schedule::{Scheduler, Timer};
use ui::sound::{Sfx, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const BLINK_MS: u128 = 500;

fn main() {
    let _log_guard = logging::init();
    let config = AppConfig::load();
    info!(
        buying_power = config.buying_power_usd,
        tick_ms = config.timing.tick_rate_ms,
        "starting"
    );

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        error!(error = %e, "terminal init failed");
        eprintln!("{}", AppError::Terminal(e));
        return;
    }

    let result = run(&mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        error!(error = %e, "terminal cleanup failed");
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(()) => info!("disconnected"),
        Err(e) => {
            error!(error = %e, "exited with error");
            eprintln!("matrix-handheld: {e}");
        }
    }
}

fn run(renderer: &mut Renderer, config: &AppConfig) -> Result<(), AppError> {
    let advisory = AdvisoryService::from_config(&config.advisory)?;
    let start = Instant::now();
    let mut app = App::new(config, advisory, SoundEngine::new(), start);

    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let tick_rate = config.timing.tick();
    let mut last_tick = start;

    loop {
        kb.drain_events();
        gp.update();

        if kb.interrupted() {
            info!("interrupted");
            break;
        }
        if kb.resized() {
            renderer.invalidate();
        }

        let now = Instant::now();
        let actions: Vec<Action> = kb.actions().iter().copied().chain(gp.actions()).collect();
        if actions.into_iter().any(|action| app.handle(action, now) == Flow::Quit) {
            break;
        }

        app.fire_timers(now);
        app.drain_advisory();

        if now.duration_since(last_tick) >= tick_rate {
            app.tick();
            renderer.render(&app.scene(now, gp.connected))?;
            last_tick = now;
        }

        std::thread::sleep(FRAME_SLEEP);
    }

    info!(orders = app.exchange.executed(), "session ended");
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Flow {
    Continue,
    Quit,
}

/// Owns the controller plus everything that reacts to its effects:
/// notification slot, timers, transition effects, order sink, advisory
/// service and sound.
struct App {
    ctl: Controller,
    toast: Toast,
    timers: Scheduler,
    rain: Option<DigitalRain>,
    power_on: Option<(Instant, Duration)>,
    exchange: MockExchange,
    advisory: AdvisoryService,
    sound: Option<SoundEngine>,
    timing: TimingConfig,
    perps: Vec<PerpContract>,
    account: AccountSnapshot,
    started: Instant,
}

impl App {
    fn new(config: &AppConfig, advisory: AdvisoryService, sound: Option<SoundEngine>, now: Instant) -> Self {
        let timing = config.timing.clone();
        let mut app = App {
            ctl: Controller::new(mock::coins(), config.buying_power_usd),
            toast: Toast::new(timing.notification()),
            timers: Scheduler::new(),
            rain: None,
            power_on: None,
            exchange: MockExchange::new(),
            advisory,
            sound,
            timing,
            perps: mock::perps(),
            account: mock::account(),
            started: now,
        };
        if app.timing.power_on_ms > 0 {
            let length = app.timing.power_on();
            app.power_on = Some((now, length));
            app.timers.schedule_in(now, length, Timer::PowerOnEnd);
            app.play(Sfx::PowerOn);
        }
        app
    }

    fn play(&self, sfx: Sfx) {
        if let Some(engine) = &self.sound {
            engine.play(sfx);
        }
    }

    fn handle(&mut self, action: Action, now: Instant) -> Flow {
        debug!(?action, "action");
        for effect in self.ctl.handle(action) {
            if let Some(sfx) = Sfx::for_effect(&effect) {
                self.play(sfx);
            }
            match effect {
                Effect::Notify(text) => self.notify(text, now),
                Effect::ViewChanged { .. } => self.start_rain(now),
                Effect::Execute(order) => {
                    let message = self.exchange.execute(&order);
                    self.notify(message, now);
                }
                Effect::RequestAdvisory { visit, coin } => self.advisory.request(visit, coin),
                Effect::ModalOpened => {
                    self.timers.cancel(Timer::Typewriter);
                    self.timers.schedule_in(now, self.timing.typewriter(), Timer::Typewriter);
                }
                Effect::ModalClosed => self.timers.cancel(Timer::Typewriter),
                Effect::Quit => return Flow::Quit,
                Effect::Moved | Effect::Rejected => {}
            }
        }
        Flow::Continue
    }

    fn notify(&mut self, text: String, now: Instant) {
        let deadline = self.toast.show(text, now);
        self.timers.schedule(deadline, Timer::NotificationExpiry);
    }

    fn start_rain(&mut self, now: Instant) {
        if self.timing.rain_ms == 0 {
            return;
        }
        self.rain = Some(DigitalRain::new(SCREEN_W - 2, SCREEN_H - 2));
        self.timers.cancel(Timer::RainEnd);
        self.timers.schedule_in(now, self.timing.rain(), Timer::RainEnd);
    }

    fn fire_timers(&mut self, now: Instant) {
        for timer in self.timers.take_due(now) {
            match timer {
                Timer::Typewriter => {
                    if self.ctl.advance_modal_reveal() {
                        self.timers.schedule_in(now, self.timing.typewriter(), Timer::Typewriter);
                    }
                }
                Timer::NotificationExpiry => {
                    self.toast.expire(now);
                }
                Timer::RainEnd => self.rain = None,
                Timer::PowerOnEnd => self.power_on = None,
            }
        }
    }

    fn drain_advisory(&mut self) {
        for reply in self.advisory.drain() {
            self.ctl.advisory_ready(reply.visit, reply.text);
        }
    }

    /// Per-frame animation step.
    fn tick(&mut self) {
        if let Some(rain) = &mut self.rain {
            rain.step();
        }
    }

    fn scene(&self, now: Instant, pad: bool) -> Scene<'_> {
        let power_on = self.power_on.map(|(start, length)| {
            let elapsed = now.duration_since(start).as_secs_f32();
            (elapsed / length.as_secs_f32().max(f32::EPSILON)).min(1.0)
        });
        Scene {
            ctl: &self.ctl,
            perps: &self.perps,
            account: &self.account,
            notification: self.toast.current(),
            rain: self.rain.as_ref(),
            power_on,
            blink: (now.duration_since(self.started).as_millis() / BLINK_MS) % 2 == 0,
            pad,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::sim::advisory::OfflineAdvisor;
    use crate::sim::effect::NO_ASSETS;
    use crate::sim::state::{AdvisoryStatus, FocusState, ViewState, QUIT_WARNING};

    fn app(now: Instant) -> App {
        let config = AppConfig::default();
        let advisory = AdvisoryService::new(Arc::new(OfflineAdvisor)).unwrap();
        App::new(&config, advisory, None, now)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn power_on_runs_then_ends() {
        let t0 = Instant::now();
        let mut a = app(t0);
        assert!(a.scene(t0, false).power_on.is_some());
        a.fire_timers(t0 + ms(701));
        assert!(a.scene(t0 + ms(701), false).power_on.is_none());
    }

    #[test]
    fn rejected_sell_shows_then_expires() {
        let t0 = Instant::now();
        let mut a = app(t0);
        for _ in 0..4 {
            a.handle(Action::Down, t0);
        }
        a.handle(Action::Right, t0);
        a.handle(Action::Confirm, t0);
        assert_eq!(a.toast.current(), Some(NO_ASSETS));

        a.fire_timers(t0 + ms(2000));
        assert_eq!(a.toast.current(), Some(NO_ASSETS));
        a.fire_timers(t0 + ms(2500));
        assert_eq!(a.toast.current(), None);
    }

    #[test]
    fn newer_notification_survives_older_timer() {
        let t0 = Instant::now();
        let mut a = app(t0);
        a.notify("first".into(), t0);
        a.notify("second".into(), t0 + ms(1000));
        a.fire_timers(t0 + ms(2600));
        assert_eq!(a.toast.current(), Some("second"));
        a.fire_timers(t0 + ms(3600));
        assert_eq!(a.toast.current(), None);
    }

    #[test]
    fn confirmed_order_reaches_exchange() {
        let t0 = Instant::now();
        let mut a = app(t0);
        a.handle(Action::Confirm, t0); // BUY BTC
        a.handle(Action::Confirm, t0); // "2"
        for _ in 0..4 {
            a.handle(Action::Down, t0);
        }
        a.handle(Action::Confirm, t0);
        assert_eq!(a.exchange.executed(), 1);
        assert_eq!(a.toast.current(), Some("EXECUTED: BUY 2 BTC"));
        assert_eq!(a.ctl.view(), ViewState::MarketList);
    }

    #[test]
    fn view_change_starts_rain_for_a_while() {
        let t0 = Instant::now();
        let mut a = app(t0);
        a.handle(Action::ShoulderNext, t0);
        assert!(a.rain.is_some());
        a.fire_timers(t0 + ms(600));
        assert!(a.rain.is_none());
    }

    #[test]
    fn typewriter_reveals_and_quit_exits() {
        let t0 = Instant::now();
        let mut a = app(t0);
        a.handle(Action::SystemMenu, t0);
        let mut t = t0;
        for _ in 0..QUIT_WARNING.chars().count() + 5 {
            t += ms(30);
            a.fire_timers(t);
        }
        let modal = a.ctl.modal().cloned().unwrap_or_default();
        assert!(modal.fully_revealed());
        assert!(!a.timers.is_pending(Timer::Typewriter));

        assert_eq!(a.handle(Action::Left, t), Flow::Continue);
        assert_eq!(a.handle(Action::Confirm, t), Flow::Quit);
    }

    #[test]
    fn closing_modal_stops_typewriter() {
        let t0 = Instant::now();
        let mut a = app(t0);
        a.handle(Action::SystemMenu, t0);
        a.handle(Action::Cancel, t0);
        assert!(!a.timers.is_pending(Timer::Typewriter));
        assert!(a.ctl.modal().is_none());
    }

    #[test]
    fn advisory_reply_lands_in_transaction() {
        let t0 = Instant::now();
        let mut a = app(t0);
        a.handle(Action::Confirm, t0);
        a.handle(Action::Secondary, t0);
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            a.drain_advisory();
            let ready = matches!(
                a.ctl.focus(),
                FocusState::Transaction(tx) if matches!(tx.advisory, AdvisoryStatus::Ready(_))
            );
            if ready || Instant::now() > deadline {
                break;
            }
            std::thread::sleep(ms(5));
        }
        match a.ctl.focus() {
            FocusState::Transaction(tx) => match &tx.advisory {
                AdvisoryStatus::Ready(text) => assert!(text.starts_with("STATUS:")),
                other => panic!("advisory not delivered: {other:?}"),
            },
            other => panic!("left transaction: {other:?}"),
        }
    }
}
