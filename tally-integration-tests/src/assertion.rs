#![allow(clippy::eq_op, clippy::approx_constant)]
use tally::{assertion, check, check_eq, check_ne, Asserter, Registry};

pub fn register(registry: &mut Registry) {
    registry
        .suite("assertion")
        .add("check_basic_true", || {
            check!(true);
            Ok(())
        })
        .add("check_with_message", || {
            check!(1 == 1, "Numbers should be equal");
            Ok(())
        })
        .add("check_expression", || {
            let x = 5;
            let y = 10;
            check!(x < y);
            check!(x + y == 15);
            check!(x != y);
            Ok(())
        })
        .add("equal_integers", || {
            assertion::equal(42, 42)?;
            assertion::equal(0, 0)?;
            check_eq!(-1, -1);
            Ok(())
        })
        .add("equal_strings", || {
            assertion::equal("hello", "hello")?;
            assertion::equal(String::from("world").as_str(), "world")?;
            check_eq!("", "", "empty strings are equal");
            Ok(())
        })
        .add("not_equal", || {
            assertion::not_equal(1, 2)?;
            assertion::not_equal("foo", "bar")?;
            check_ne!("", "non-empty");
            Ok(())
        })
        .add("booleans", || {
            assertion::is_true(3 > 2)?;
            assertion::is_false("".contains('x'))?;
            Ok(())
        })
        .add("ordering_integers", || {
            assertion::less_than(1, 2)?;
            assertion::less_or_equal(2, 2)?;
            assertion::greater_than(3, 2)?;
            assertion::greater_or_equal(3, 3)?;
            Ok(())
        })
        .add("ordering_floats", || {
            assertion::less_than(3.14, 3.15)?;
            assertion::greater_or_equal(2.0_f64.sqrt(), 1.41)?;
            Ok(())
        })
        .add("ordering_strings", || {
            assertion::less_than("apple", "banana")?;
            Ok(())
        })
        .add("quiet_failure_hides_values", || {
            let failure = Asserter::quiet().equal("secret", "token").unwrap_err();
            check_eq!(failure.message(), "Condition assertEqual not met.");
            Ok(())
        })
        .add("verbose_failure_shows_values", || {
            let failure = assertion::equal(2 + 2, 5).unwrap_err();
            check_eq!(
                failure.message(),
                "Condition assertEqual not met. Values were (4, 5)."
            );
            Ok(())
        });
}
