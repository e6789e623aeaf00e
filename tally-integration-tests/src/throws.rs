use tally::{assertion, assertion::throws, ErrorKind, Registry};

#[derive(Debug, thiserror::Error)]
#[error("index {index} out of range for length {len}")]
struct OutOfRange {
    index: usize,
    len: usize,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid argument: {0}")]
struct InvalidArgument(String);

fn at(items: &[u8], index: usize) -> Result<u8, OutOfRange> {
    items.get(index).copied().ok_or(OutOfRange {
        index,
        len: items.len(),
    })
}

pub fn register(registry: &mut Registry) {
    registry
        .suite("throws")
        .add("expected_kind", || {
            throws(&[ErrorKind::of::<OutOfRange>()], || {
                at(&[1, 2, 3], 3)?;
                Ok(())
            })?;
            Ok(())
        })
        .add("any_of_several_kinds", || {
            let kinds = [
                ErrorKind::of::<InvalidArgument>(),
                ErrorKind::of::<OutOfRange>(),
            ];
            throws(&kinds, || Err(InvalidArgument("negative".into()).into()))?;
            throws(&kinds, || {
                at(&[], 0)?;
                Ok(())
            })?;
            Ok(())
        })
        .add("nothing_raised_fails", || {
            let result = throws(&[ErrorKind::of::<OutOfRange>()], || {
                at(&[1], 0)?;
                Ok(())
            });
            assertion::is_true(result.is_err())?;
            Ok(())
        })
        .add("unrelated_kind_is_contained", || {
            let result = throws(&[ErrorKind::of::<OutOfRange>()], || {
                Err(InvalidArgument("unrelated".into()).into())
            });
            assertion::equal(
                result.unwrap_err().message(),
                "Condition assertThrows not met.",
            )?;
            Ok(())
        })
        .add("panic_is_contained", || {
            let result = throws(&[ErrorKind::of::<OutOfRange>()], || {
                let items: Vec<u8> = Vec::new();
                assertion::equal(items[0], 0)?;
                Ok(())
            });
            assertion::is_true(result.is_err())?;
            throws(&[ErrorKind::panic()], || panic!("expected"))?;
            Ok(())
        })
        .add("own_failure_kind", || {
            throws(&[ErrorKind::failure()], || {
                assertion::greater_than(1, 2)?;
                Ok(())
            })?;
            Ok(())
        });
}
