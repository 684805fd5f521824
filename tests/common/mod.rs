//! In-process doubles for the automation server and adb
#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use droidcheck::core::{AppiumConfig, CapabilitySet, DeviceDescriptor, DeviceInventory};
use droidcheck::device::CapabilityResolver;
use droidcheck::runner::Harness;
use droidcheck::session::SessionConnector;
use droidcheck::system::DeviceProbe;
use droidcheck::webdriver::{ElementRef, Locator, UiSession};
use droidcheck::{HarnessError, Result};

const ID_PREFIX: &str = "com.google.android.calculator:id/";

/// Screen state of the simulated calculator
#[derive(Debug, Default)]
struct Screen {
    formula: String,
    result: String,
}

/// Calculator that evaluates button presses the way the real app displays them
pub struct FakeCalculator {
    screen: Mutex<Screen>,
    quits: Arc<AtomicUsize>,
    implicit_wait: Mutex<Option<Duration>>,
}

impl FakeCalculator {
    pub fn new() -> Self {
        Self::with_counter(Arc::new(AtomicUsize::new(0)))
    }

    fn with_counter(quits: Arc<AtomicUsize>) -> Self {
        Self {
            screen: Mutex::new(Screen::default()),
            quits,
            implicit_wait: Mutex::new(None),
        }
    }

    pub fn implicit_wait(&self) -> Option<Duration> {
        *self.implicit_wait.lock().unwrap()
    }

    fn press(&self, key: &str) -> Result<()> {
        let mut screen = self.screen.lock().unwrap();
        match key {
            "op_add" => screen.formula.push('+'),
            "op_sub" => screen.formula.push('-'),
            "op_mul" => screen.formula.push('*'),
            "op_div" => screen.formula.push('/'),
            "eq" => screen.result = evaluate(&screen.formula),
            "clr" => *screen = Screen::default(),
            digit if digit.len() == 1 && digit.chars().all(|c| c.is_ascii_digit()) => {
                screen.formula.push_str(digit)
            }
            other => return Err(no_such_element(other)),
        }
        Ok(())
    }
}

fn evaluate(formula: &str) -> String {
    let mut total: i64 = 0;
    let mut operand: i64 = 0;
    let mut pending = '+';
    for c in formula.chars().chain(std::iter::once('=')) {
        if let Some(d) = c.to_digit(10) {
            operand = operand * 10 + i64::from(d);
            continue;
        }
        total = match pending {
            '+' => total + operand,
            '-' => total - operand,
            '*' => total * operand,
            '/' if operand != 0 => total / operand,
            _ => return "Can't divide by 0".to_string(),
        };
        operand = 0;
        pending = c;
    }
    total.to_string()
}

fn no_such_element(what: &str) -> HarnessError {
    HarnessError::WebDriver {
        error: "no such element".into(),
        message: format!("An element could not be located: {}", what),
    }
}

/// Element key for a locator; digits use their content-desc
fn element_key(locator: &Locator) -> Option<String> {
    match locator {
        Locator::Id(id) => id.strip_prefix(ID_PREFIX).map(str::to_string),
        Locator::XPath(xpath) => xpath
            .strip_prefix("//android.widget.ImageButton[@content-desc='")
            .and_then(|rest| rest.strip_suffix("']"))
            .map(str::to_string),
    }
}

#[async_trait]
impl UiSession for FakeCalculator {
    fn session_id(&self) -> &str {
        "fake-calculator"
    }

    async fn set_implicit_wait(&self, wait: Duration) -> Result<()> {
        *self.implicit_wait.lock().unwrap() = Some(wait);
        Ok(())
    }

    async fn find_element(&self, locator: &Locator) -> Result<ElementRef> {
        element_key(locator)
            .map(ElementRef::new)
            .ok_or_else(|| no_such_element(locator.value()))
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        self.press(element.id())
    }

    async fn clear(&self, _element: &ElementRef) -> Result<()> {
        Ok(())
    }

    async fn send_keys(&self, _element: &ElementRef, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn text(&self, element: &ElementRef) -> Result<String> {
        let screen = self.screen.lock().unwrap();
        match element.id() {
            "result_final" => Ok(screen.result.clone()),
            "formula" => Ok(screen.formula.clone()),
            other => Err(no_such_element(other)),
        }
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        Ok(b"\x89PNG\r\n\x1a\n".to_vec())
    }

    async fn quit(&self) -> Result<()> {
        self.quits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Connector handing out fresh calculators
#[derive(Default)]
pub struct CalculatorConnector {
    pub refuse: bool,
    pub connects: Arc<AtomicUsize>,
    pub quits: Arc<AtomicUsize>,
    pub last_capabilities: Mutex<Option<CapabilitySet>>,
}

impl CalculatorConnector {
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn quits(&self) -> usize {
        self.quits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionConnector for CalculatorConnector {
    async fn connect(
        &self,
        _server_url: &str,
        capabilities: &CapabilitySet,
    ) -> Result<Box<dyn UiSession>> {
        *self.last_capabilities.lock().unwrap() = Some(capabilities.clone());
        if self.refuse {
            return Err(HarnessError::WebDriver {
                error: "session not created".into(),
                message: "Could not find a connected Android device".into(),
            });
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeCalculator::with_counter(self.quits.clone())))
    }
}

/// adb double reporting a fixed device list
pub struct StaticProbe(pub Vec<String>);

#[async_trait]
impl DeviceProbe for StaticProbe {
    async fn connected_devices(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

pub const APPIUM_CONFIG: &str = r#"
server:
  full_server_path: "http://127.0.0.1:4723"
capabilities:
  platformName: Android
  newCommandTimeout: 300
applications:
  calculator:
    appPackage: com.google.android.calculator
    appActivity: com.android.calculator2.Calculator
"#;

/// Resolver over the test inventory, with `connected` as the adb answer
pub fn resolver(connected: &[&str]) -> CapabilityResolver {
    let config = AppiumConfig::from_yaml(APPIUM_CONFIG).unwrap();
    let inventory = DeviceInventory {
        devices: vec![
            DeviceDescriptor::new("emulator-5554"),
            DeviceDescriptor::new("R58M123ABCD"),
        ],
    };
    let probe = StaticProbe(connected.iter().map(|s| s.to_string()).collect());
    CapabilityResolver::new(config, inventory).with_probe(Arc::new(probe))
}

pub fn harness(connector: Arc<CalculatorConnector>, connected: &[&str]) -> Harness {
    Harness {
        resolver: resolver(connected),
        connector,
        device_index: None,
    }
}

/// Scenario files shipped with the crate
pub fn shipped_scenarios() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios")
}

/// Directories directly under `dir`
pub fn subdirs(dir: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}
