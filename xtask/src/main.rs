#[cfg(test)]
mod tidy;

use std::time::Instant;

use xshell::{cmd, Shell};

fn main() -> xshell::Result<()> {
    let sh = Shell::new()?;

    cmd!(sh, "rustup toolchain install stable --no-self-update").run()?;
    let _e = sh.push_env("RUSTUP_TOOLCHAIN", "stable");
    cmd!(sh, "rustc --version").run()?;

    {
        let _s = section("BUILD");
        cmd!(sh, "cargo test --workspace --no-run").run()?;
    }

    {
        let _s = section("TEST");
        cmd!(sh, "cargo test --workspace -- --nocapture").run()?;
    }

    {
        let _s = section("DEMO");
        cmd!(sh, "cargo run --example user-admin -- help").run()?;
    }

    let _s = section("PUBLISH");
    publish(&sh)
}

/// Tags and publishes the crate from `master` when its version is not tagged yet.
fn publish(sh: &Shell) -> xshell::Result<()> {
    let pkgid = cmd!(sh, "cargo pkgid -p subflags").read()?;
    let version = pkgid.rsplit_once('#').map_or(pkgid.as_str(), |it| it.1);
    let tag = format!("v{version}");

    let on_master = cmd!(sh, "git branch --show-current").read()? == "master";
    let tagged = cmd!(sh, "git tag --list").read()?.split_ascii_whitespace().any(|it| it == tag);
    if on_master && !tagged {
        cmd!(sh, "git tag {tag}").run()?;
        cmd!(sh, "cargo publish -p subflags").run()?;
        cmd!(sh, "git push --tags").run()?;
    }
    Ok(())
}

/// Folds the output of one CI step into a collapsible group and reports how
/// long the step took once the guard goes out of scope.
struct Section {
    name: &'static str,
    start: Instant,
}

fn section(name: &'static str) -> Section {
    println!("::group::{name}");
    Section { name, start: Instant::now() }
}

impl Drop for Section {
    fn drop(&mut self) {
        eprintln!("{}: {:.2?}", self.name, self.start.elapsed());
        println!("::endgroup::");
    }
}
