#[macro_export]
macro_rules! assert_err {
    ($e:expr $(, $($t:tt)* )?) => {
        match $e {
            Err(e) => e,
            actual => {
                use std::fmt::Write;
                let mut msg = format!("expected `Err`; actual={:?}", actual);

                $(
                    write!(msg, ", ").unwrap();
                    write!(msg, $($t)*).unwrap();
                )?

                panic!("{}", msg);
            }
        }
    };
}

#[macro_export]
macro_rules! assert_ok {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            actual => panic!("expected `Ok`; actual={:?}", actual),
        }
    };
}

/// Asserts that the values-array positions of `$mapping`'s selections
/// carry the given column labels, in order.
#[macro_export]
macro_rules! assert_selections {
    ($mapping:expr, [ $( $label:expr ),* $(,)? ]) => {{
        let labels: Vec<&str> = $mapping
            .selections
            .iter()
            .map(|selection| selection.column_name.as_str())
            .collect();
        let expect: Vec<&str> = vec![ $( $label ),* ];
        assert_eq!(labels, expect);
    }};
}
