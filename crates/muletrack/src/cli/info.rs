use super::utils::{rule, CYAN, GREEN, GREY, RESET};

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn show_version() {
    println!("{}muletrack{} {}", GREEN, RESET, BUILD_VERSION);
    rule(50);
    println!("  Version:       {}{}{}", CYAN, BUILD_VERSION, RESET);
    println!(
        "  Profile:       {}{}{}",
        GREY,
        if cfg!(debug_assertions) { "debug" } else { "release" },
        RESET
    );
    println!("  Concurrency:   {}{} in flight{}", CYAN, muletrack::config::DEFAULT_CONCURRENCY_LIMIT, RESET);
    println!(
        "  Dispatch gap:  {}{} ms{}",
        CYAN,
        muletrack::config::DEFAULT_DISPATCH_INTERVAL_MS,
        RESET
    );
    rule(50);
}
