/// Declare an ordered rule list.
///
/// Evaluates to `Result<Vec<RuleSpec>, LexError>`; each entry ends with `;`.
///
/// ```text
/// rules![
///     "IDENTIFIER" => r"[A-Za-z_]\w*";              // Identity
///     ignore "WS" => r"[ \t]+";
///     integer "CONSTANT" => r"-?[0-9]+";
///     convert "OCTAL" => r"0[0-7]+", with: Converter::radix(8);
///     keep_if "NEWLINE" => r"\s+", keep: "\n";
///     switch "COMMENT_START" => r"/\*", to: SwitchTarget::named("COMMENT");
///     switch "QUIET_OPEN" => r"\(\*", to: SwitchTarget::Next, then: Transform::Ignore;
///     keyword "while";
///     reserved "EOF";
/// ]
/// ```
#[macro_export]
macro_rules! rules {
    ($($body:tt)*) => {{
        (|| -> $crate::Result<::std::vec::Vec<$crate::RuleSpec>> {
            #[allow(unused_mut)]
            let mut specs = ::std::vec::Vec::new();
            $crate::__push_rules!(specs; $($body)*);
            Ok(specs)
        })()
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __push_rules {
    ($v:ident;) => {};
    ($v:ident; ignore $name:literal => $pat:expr; $($rest:tt)*) => {
        $v.push($crate::RuleSpec::ignore($name, $pat)?);
        $crate::__push_rules!($v; $($rest)*);
    };
    ($v:ident; integer $name:literal => $pat:expr; $($rest:tt)*) => {
        $v.push($crate::RuleSpec::integer($name, $pat)?);
        $crate::__push_rules!($v; $($rest)*);
    };
    ($v:ident; convert $name:literal => $pat:expr, with: $conv:expr; $($rest:tt)*) => {
        $v.push($crate::RuleSpec::convert($name, $pat, $conv)?);
        $crate::__push_rules!($v; $($rest)*);
    };
    ($v:ident; keep_if $name:literal => $pat:expr, keep: $keep:expr; $($rest:tt)*) => {
        $v.push($crate::RuleSpec::keep_if($name, $pat, $keep)?);
        $crate::__push_rules!($v; $($rest)*);
    };
    ($v:ident; switch $name:literal => $pat:expr, to: $target:expr, then: $then:expr; $($rest:tt)*) => {
        $v.push($crate::RuleSpec::new($name, $pat)?.with_transform($then).switching($target));
        $crate::__push_rules!($v; $($rest)*);
    };
    ($v:ident; switch $name:literal => $pat:expr, to: $target:expr; $($rest:tt)*) => {
        $v.push($crate::RuleSpec::switch($name, $pat, $target)?);
        $crate::__push_rules!($v; $($rest)*);
    };
    ($v:ident; keyword $word:literal; $($rest:tt)*) => {
        $v.push($crate::RuleSpec::keyword($word)?);
        $crate::__push_rules!($v; $($rest)*);
    };
    ($v:ident; reserved $name:literal; $($rest:tt)*) => {
        $v.push($crate::RuleSpec::reserved($name));
        $crate::__push_rules!($v; $($rest)*);
    };
    ($v:ident; $name:literal => $pat:expr; $($rest:tt)*) => {
        $v.push($crate::RuleSpec::new($name, $pat)?);
        $crate::__push_rules!($v; $($rest)*);
    };
}
