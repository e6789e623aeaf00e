mod assertion;
mod misc;
mod ordered;
mod throws;

use tally::{eyre, Registry};

fn main() -> eyre::Result<()> {
    let mut registry = Registry::new();
    assertion::register(&mut registry);
    throws::register(&mut registry);
    ordered::register(&mut registry);
    misc::register(&mut registry);
    #[cfg(feature = "fail-test")]
    fail_test::register(&mut registry);

    tally::App::new().run(registry)
}
