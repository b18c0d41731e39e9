use std::cell::RefCell;

use apacheconf::commands::*;
use apacheconf::Result;
use mockall::mock;

mock! {
    pub Runner {}

    impl CommandRunner for Runner {
        fn run(&self, command: &CommandLine) -> Result<String>;
        fn run_all(&self, command: &CommandLine) -> Result<CommandOutput>;
        fn retcode(&self, command: &CommandLine) -> Result<i32>;
    }
}

/// Records every command line and answers with canned stdout
struct RecordingRunner {
    stdout: String,
    seen: RefCell<Vec<String>>,
}

impl RecordingRunner {
    fn new(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &CommandLine) -> Result<String> {
        self.seen.borrow_mut().push(command.to_string());
        Ok(self.stdout.clone())
    }

    fn run_all(&self, command: &CommandLine) -> Result<CommandOutput> {
        Ok(CommandOutput {
            retcode: 0,
            stdout: self.run(command)?,
            stderr: String::new(),
        })
    }

    fn retcode(&self, command: &CommandLine) -> Result<i32> {
        self.run(command).map(|_| 0)
    }
}

#[test]
fn test_wrappers_use_configured_control_binary() {
    let runner = RecordingRunner::new("");
    let apache = Apache::new(&runner, "apache2ctl");

    apache.fullversion().unwrap();
    apache.modules().unwrap();
    apache.servermods().unwrap();
    apache.directives().unwrap();
    apache.vhosts().unwrap();
    apache.signal(Signal::Restart).unwrap();

    assert_eq!(
        *runner.seen.borrow(),
        vec![
            "apache2ctl -V",
            "apache2ctl -M",
            "apache2ctl -l",
            "apache2ctl -L",
            "apache2ctl -S",
            "apache2ctl -k restart",
        ]
    );
}

fn signal_runner(stdout: &'static str, stderr: &'static str) -> MockRunner {
    let mut runner = MockRunner::new();
    runner.expect_run_all().times(1).returning(move |_| {
        Ok(CommandOutput {
            retcode: 0,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        })
    });
    runner
}

#[test]
fn test_signal_prefers_stderr_then_stdout() {
    let running = "  httpd (pid 42) already running\n";

    let both = Apache::new(signal_runner(running, "  Syntax OK\n"), "apachectl");
    assert_eq!(both.signal(Signal::Start).unwrap(), "Syntax OK");

    let blank_stderr = Apache::new(signal_runner(running, "   "), "apachectl");
    assert_eq!(
        blank_stderr.signal(Signal::Start).unwrap(),
        "httpd (pid 42) already running"
    );
}

#[test]
fn test_toggle_utilities() {
    assert_eq!(Toggle::Enable.utility(Target::Site), "a2ensite");
    assert_eq!(Toggle::Disable.utility(Target::Site), "a2dissite");
    assert_eq!(Toggle::Enable.utility(Target::Mod), "a2enmod");
    assert_eq!(Toggle::Disable.utility(Target::Mod), "a2dismod");
    assert_eq!(Toggle::Enable.utility(Target::Conf), "a2enconf");
    assert_eq!(Toggle::Disable.utility(Target::Conf), "a2disconf");
}

#[test]
fn test_toggle_through_trait_object() {
    let runner = RecordingRunner::new("");
    let dyn_runner: &dyn CommandRunner = &runner;

    let report = toggle(dyn_runner, Toggle::Enable, Target::Conf, "security").unwrap();

    assert_eq!(report.to_string(), "Apache2 Enable Conf: Conf security enabled");
    assert_eq!(*runner.seen.borrow(), vec!["a2enconf security"]);
}

#[test]
fn test_toggle_report_for_unexpected_code() {
    let mut runner = MockRunner::new();
    runner.expect_retcode().times(1).returning(|_| Ok(137));

    let report = a2dissite(&runner, "example.com").unwrap();

    assert_eq!(report.status, ToggleStatus::Exit(137));
    assert_eq!(report.message(), "137");
    assert_eq!(report.title(), "Apache2 Disable Site");
}

#[test]
fn test_command_line_display() {
    let command = CommandLine::new("a2enmod").arg("-l");
    assert_eq!(command.to_string(), "a2enmod -l");
    assert_eq!(CommandLine::new("apachectl").to_string(), "apachectl");
}

#[cfg(unix)]
#[test]
fn test_process_runner_captures_output() {
    let runner = ProcessRunner;

    let out = runner
        .run_all(&CommandLine::new("sh").arg("-c").arg("echo out; echo err >&2; exit 3"))
        .unwrap();

    assert_eq!(out.retcode, 3);
    assert_eq!(out.stdout, "out\n");
    assert_eq!(out.stderr, "err\n");
}

#[test]
fn test_process_runner_spawn_failure() {
    let runner = ProcessRunner;

    let err = runner
        .run(&CommandLine::new("definitely-not-a-real-apachectl-binary"))
        .unwrap_err();

    assert!(matches!(err, apacheconf::Error::Spawn { .. }));
}
