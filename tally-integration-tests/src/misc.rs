use tally::{assertion, eyre, Registry};

pub fn register(registry: &mut Registry) {
    // Same case name under two suites, plus a plain registration.
    registry
        .suite("misc")
        .add("same_test_name_in_different_suites", || Ok(()));
    registry
        .suite("misc::nested")
        .add("same_test_name_in_different_suites", || Ok(()));
    registry.register("misc_without_suite", || Ok(()));

    registry.suite("misc").add("question_mark_on_std_errors", || {
        let n: u32 = "42".parse()?;
        assertion::equal(n, 42)?;
        Ok(())
    });

    registry.suite("misc").add("eyre_ensure", || {
        let items = [1, 2, 3];
        eyre::ensure!(!items.is_empty(), "items should not be empty");
        assertion::equal(items.iter().sum::<i32>(), 6)?;
        Ok(())
    });
}
