/// Asserts that running `$run` panics. The block is wrapped in
/// [`AssertUnwindSafe`](std::panic::AssertUnwindSafe), so it may borrow from the surrounding
/// test, which must not rely on the borrowed state being consistent afterwards (beyond what it
/// asserts about).
#[allow(unused_macros)]
macro_rules! assert_panics {
    ($run:block) => {
        assert_panics!($run, "assertion failed to panic")
    };
    ($run:block, $msg:literal) => {
        assert!(
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $run)).is_err(),
            $msg
        );
    };
}

#[allow(unused_imports)]
pub(crate) use assert_panics;
