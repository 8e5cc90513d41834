//! Built-in member lists and hint documentation.

use serde::Serialize;

use crate::types::TypeTag;

/// What a completion candidate stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Method,
    Property,
    Constant,
    Variable,
    Function,
    Class,
    Keyword,
}

/// Members offered after `owner.` for one type tag.
#[derive(Debug)]
pub struct MemberSet {
    pub methods: &'static [&'static str],
    pub constants: &'static [&'static str],
}

impl MemberSet {
    const fn methods(methods: &'static [&'static str]) -> Self {
        Self { methods, constants: &[] }
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.constants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, CandidateKind)> + '_ {
        self.constants
            .iter()
            .map(|c| (*c, CandidateKind::Constant))
            .chain(self.methods.iter().map(|m| (*m, CandidateKind::Method)))
    }
}

static EMPTY: MemberSet = MemberSet::methods(&[]);

static STRING: MemberSet = MemberSet::methods(&[
    "charAt", "compare", "concat", "contains", "endsWith", "startsWith", "toArray", "length", "indexOf",
    "lastIndexOf", "matches", "replace", "replaceAll", "split", "subString", "toLowerCase", "toUpperCase",
    "trim", "join",
]);

static ARRAY: MemberSet = MemberSet::methods(&[
    "push", "pop", "unshift", "shift", "insertAt", "insertRange", "removeAt", "removeRange", "slice",
    "concat", "clear", "clone",
]);

static NUMBER: MemberSet = MemberSet::methods(&["parse"]);

static SYS: MemberSet = MemberSet::methods(&[
    "alert", "stop", "err", "noti", "playMedia", "toast", "log", "info", "currentTime", "currentVersion",
    "sdk", "lang", "darkMode", "globalAction", "dpi", "openApp", "wake",
]);

static MAP: MemberSet = MemberSet::methods(&[
    "entries", "keys", "values", "containsKey", "containsValue", "get", "put", "putAll", "putIfAbsent",
    "remove", "replace", "size", "isEmpty",
]);

static MATH: MemberSet = MemberSet::methods(&[
    "E", "pl", "cos", "sin", "tan", "acos", "asin", "atan", "atan2", "sqrt", "cbrt", "hypot", "ceil",
    "floor", "round", "exp", "pow", "log", "log10", "log1p", "abs", "max", "min", "random", "toDegrees",
    "toRadians", "randomRange",
]);

static POINT: MemberSet = MemberSet {
    methods: &["scale"],
    constants: &["LEFT", "TOP", "RIGHT", "BOTTOM"],
};

static POINT_VALUE: MemberSet = MemberSet::methods(&["getX", "getY", "offset", "noScale"]);

static SWIPE_POINT_VALUE: MemberSet = MemberSet::methods(&["getX", "getY", "getHold", "getSpeed"]);

static MULTI_SWIPE: MemberSet = MemberSet::methods(&["builder"]);

static MULTI_SWIPE_BUILDER: MemberSet = MemberSet::methods(&["add", "setSParam", "build"]);

static TOUCH: MemberSet = MemberSet::methods(&["down", "up", "move", "dispatch"]);

static REGION: MemberSet = MemberSet {
    methods: &["deviceReg", "macroReg", "scale", "highlightOff"],
    constants: &["LEFT", "TOP", "RIGHT", "BOTTOM"],
};

static REGION_VALUE: MemberSet = MemberSet::methods(&[
    "getX", "getY", "getW", "getH", "getMiddlePoint", "getLastMatch", "getLastMatches", "setX", "setY",
    "setW", "setH", "noScale", "left", "top", "right", "horizontal", "vertical", "middle", "pad",
    "leftPixel", "topPixel", "rightPixel", "bottomPixel", "horizontalPixel", "verticalPixel",
    "middlePixel", "padPixel", "offset", "find", "findMulti", "findAll", "findAny", "click",
    "clickMulti", "clickAll", "clickAny", "wait", "waitAll", "findText", "findMultiText", "findAllText",
    "findAnyText", "clickText", "clickMultiText", "clickAllText", "clickAnyText", "waitText",
    "waitAllText", "highlight", "highlightOff", "capture", "read", "readPlain", "readAsString",
    "readAsNumber",
]);

static REGION_MATCH: MemberSet = MemberSet::methods(&["getRegion", "getPoint", "getScore", "click"]);

static REGION_TEXT_MATCH: MemberSet = MemberSet::methods(&["getRegion", "getPoint", "getText", "click"]);

static TEMPLATE: MemberSet = MemberSet::methods(&["image", "color", "text"]);

static TEMPLATE_BUILDER: MemberSet = MemberSet::methods(&[
    "value", "mScore", "method", "segment", "mask", "offset", "width", "height", "scale", "rotate", "gray",
    "threshold", "build",
]);

static SETTING: MemberSet = MemberSet::methods(&[
    "get", "set", "remove", "clear", "save", "loadVars", "setDialog", "show", "builder",
]);

static SETTING_BUILDER: MemberSet = MemberSet::methods(&[
    "add", "group", "groupEnd", "setTitle", "setPositiveButton", "setNegativeButton", "build",
]);

static SETTING_DIALOG: MemberSet = MemberSet::methods(&["show", "preview"]);

static ON_SCREEN_TEXT: MemberSet = MemberSet::methods(&["off"]);

static ON_SCREEN_TEXT_VALUE: MemberSet = MemberSet::methods(&[
    "getX", "getY", "getW", "getH", "getText", "getTextColor", "getBackgroundColor", "getRegion",
    "getClickState", "getMoveState", "getResizeState", "setX", "setY", "setW", "setH", "setText",
    "setTextColor", "setBackgroundColor", "setBackgroundImage", "setTextSize", "moveable", "clickable",
    "resizable", "noScale", "show", "hidden", "off",
]);

static DATE_TIME: MemberSet = MemberSet::methods(&["parse", "fromUnixMillis", "timeZoneOffset"]);

static DATE_TIME_VALUE: MemberSet = MemberSet::methods(&[
    "date", "year", "month", "day", "dayOfWeek", "dayOfYear", "hour", "minute", "second", "millis",
    "totalMillis", "add", "addYears", "addMonths", "addDays", "addHours", "addMinutes", "addSeconds",
    "addMillis", "sub", "format",
]);

static TIME_SPAN: MemberSet = MemberSet::methods(&["fromDays", "fromHours", "fromMinutes", "fromSeconds"]);

static TIME_SPAN_VALUE: MemberSet = MemberSet::methods(&[
    "days", "hours", "minutes", "seconds", "millis", "totalDays", "totalHours", "totalMinutes",
    "totalSeconds", "totalMillis", "isNegative", "isZero", "add", "addDays", "addHours", "addMinutes",
    "addSeconds", "addMillis", "sub", "mul", "div", "format",
]);

static STOPWATCH_VALUE: MemberSet = MemberSet::methods(&[
    "start", "stop", "reset", "restart", "elapsed", "isRunning", "isElapsed",
]);

static CLIPBOARD_VALUE: MemberSet = MemberSet::methods(&["clear", "copy", "paste"]);

static OVERLAY_VALUE: MemberSet = MemberSet::methods(&[
    "setOpacity", "getState", "setState", "getRegion", "move", "spin",
]);

static FILE: MemberSet = MemberSet::methods(&[
    "writeText", "writeLines", "appendText", "appendLines", "readText", "readLines", "separator", "copy",
    "delete", "exists", "isDir", "mkdirs", "list",
]);

static CACHE: MemberSet = MemberSet::methods(&["screen", "screenOff", "region", "regionOff", "clearImage"]);

static ENV: MemberSet = MemberSet::methods(&[
    "macroX", "setMacroX", "macroY", "setMacroY", "deviceX", "deviceY", "deviceW", "deviceH", "scale",
    "setScale", "setCompareWidth", "isDebug", "setDebug", "setMessageDone", "setMessageStop",
    "setMessageError", "setMacroCutouts", "setDeviceCutouts", "cutouts",
]);

static VERSION_VALUE: MemberSet = MemberSet::methods(&["major", "minor", "build", "revision", "compare"]);

/// Members of a tag. `Boolean`, `Null` and `Any` have none of their own.
pub fn members(tag: TypeTag) -> &'static MemberSet {
    match tag {
        TypeTag::String => &STRING,
        TypeTag::Number => &NUMBER,
        TypeTag::Array => &ARRAY,
        TypeTag::Boolean | TypeTag::Null | TypeTag::Any => &EMPTY,
        TypeTag::Sys => &SYS,
        TypeTag::Map => &MAP,
        TypeTag::Math => &MATH,
        TypeTag::Point => &POINT,
        TypeTag::PointValue => &POINT_VALUE,
        TypeTag::SwipePointValue => &SWIPE_POINT_VALUE,
        TypeTag::MultiSwipe => &MULTI_SWIPE,
        TypeTag::MultiSwipeBuilder => &MULTI_SWIPE_BUILDER,
        TypeTag::Touch => &TOUCH,
        TypeTag::Region => &REGION,
        TypeTag::RegionValue => &REGION_VALUE,
        TypeTag::RegionMatch => &REGION_MATCH,
        TypeTag::RegionTextMatch => &REGION_TEXT_MATCH,
        TypeTag::Template => &TEMPLATE,
        TypeTag::TemplateBuilder => &TEMPLATE_BUILDER,
        TypeTag::Setting => &SETTING,
        TypeTag::SettingBuilder => &SETTING_BUILDER,
        TypeTag::SettingDialog => &SETTING_DIALOG,
        TypeTag::OnScreenText => &ON_SCREEN_TEXT,
        TypeTag::OnScreenTextValue => &ON_SCREEN_TEXT_VALUE,
        TypeTag::DateTime => &DATE_TIME,
        TypeTag::DateTimeValue => &DATE_TIME_VALUE,
        TypeTag::TimeSpan => &TIME_SPAN,
        TypeTag::TimeSpanValue => &TIME_SPAN_VALUE,
        TypeTag::StopwatchValue => &STOPWATCH_VALUE,
        TypeTag::ClipboardValue => &CLIPBOARD_VALUE,
        TypeTag::OverlayValue => &OVERLAY_VALUE,
        TypeTag::File => &FILE,
        TypeTag::Cache => &CACHE,
        TypeTag::Env => &ENV,
        TypeTag::VersionValue => &VERSION_VALUE,
    }
}

/// Helpers callable without a namespace.
pub const GLOBAL_FUNCTIONS: &[&str] = &["out", "in", "wait", "swipe", "click"];

pub const DECLARATION_KEYWORD: &str = "var";

pub const KEYWORDS: &[&str] = &["if", "else", "while", "do", "for", "return", "fun", "class"];

/// Bare names of the built-in objects.
pub const NAMESPACE_ROOTS: &[&str] = &[
    "Sys", "Map", "Math", "Point", "SwipePoint", "MultiSwipe", "Touch", "Region", "Template", "Setting",
    "OnScreenText", "DateTime", "TimeSpan", "Stopwatch", "Clipboard", "Overlay", "File", "Cache", "Env",
    "Version",
];

/// Hint keys for candidates that stand for names declared in the document.
pub const VARIABLE_HINT: &str = "varNameIntellisense";
pub const FUNCTION_HINT: &str = "funNameIntellisense";
pub const CLASS_HINT: &str = "classNameIntellisense";

/// Key under which a member's hint is stored, e.g. `array.push`.
pub fn member_key(tag: TypeTag, member: &str) -> String {
    format!("{}.{member}", tag.label())
}

#[derive(Debug)]
pub struct Hint {
    pub detail: &'static str,
    pub lines: &'static [&'static str],
}

impl Hint {
    pub fn documentation(&self) -> String {
        let mut out = String::new();
        for line in self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

static HINTS: &[(&str, Hint)] = &[
    (
        "var",
        Hint {
            detail: "Variable declaration",
            lines: &[
                "Declare variable",
                "\tvar i = \"hello\";",
                "A variable declared inside a block is visible until the block closes.",
                "if (true) {",
                "\tvar i = 0;",
                "}",
            ],
        },
    ),
    (
        "if",
        Hint {
            detail: "Condition declaration",
            lines: &[
                "var i = 1;",
                "if (i == 0) {",
                "\tSys.alert(\"i equals zero\");",
                "} else if (i == 1) {",
                "\tSys.alert(\"i equals one\");",
                "} else {",
                "\tSys.alert(\"i is neither zero nor one\");",
                "}",
                "The 'else' branch runs when every condition above it is false.",
            ],
        },
    ),
    (
        "while",
        Hint {
            detail: "While loop",
            lines: &[
                "var arr = [1, 2, 3, 4, 5];",
                "while (arr.length > 0) {",
                "\tarr.pop();",
                "}",
                "Runs the block until the condition becomes false.",
            ],
        },
    ),
    (
        "do",
        Hint {
            detail: "Do-while loop",
            lines: &[
                "var i = 0;",
                "do {",
                "\ti = i + 1;",
                "} while (i < 10);",
                "Runs the block once, then repeats it while the condition holds.",
            ],
        },
    ),
    (
        "for",
        Hint {
            detail: "For loop",
            lines: &[
                "for (var i = 0; i <= 15; i = i + 1) {",
                "\tSys.toast(i);",
                "}",
                "The first clause declares the loop variable.",
                "The second clause is checked before every iteration.",
                "The third clause runs after every iteration.",
                "",
                "for (var item : items) {",
                "\tSys.toast(item);",
                "}",
                "Iterates over every element of an array.",
            ],
        },
    ),
    (
        "fun",
        Hint {
            detail: "Function declaration",
            lines: &[
                "fun increase(number) {",
                "\treturn number + 1;",
                "}",
                "",
                "var num = 0;",
                "num = increase(num);",
                "",
                "Parameters are separated by commas and are visible only inside the function.",
                "'return' gives the value back to the caller.",
            ],
        },
    ),
    (
        "class",
        Hint {
            detail: "Class declaration",
            lines: &[
                "class Counter(start) {",
                "\tinit(start) {",
                "\t\tthis.value = start;",
                "\t}",
                "\tnext() {",
                "\t\tthis.value = this.value + 1;",
                "\t}",
                "}",
                "Classes group variables together with the methods that manage them.",
            ],
        },
    ),
    (
        "array.push",
        Hint {
            detail: "Array's methods",
            lines: &[
                "Adds the value to the end of the array",
                "\tvar arr = [1, 2, 3];",
                "\tarr.push(4);",
                "\tSys.alert(arr); // [1, 2, 3, 4]",
            ],
        },
    ),
    (
        "array.pop",
        Hint {
            detail: "Array's methods",
            lines: &[
                "Removes the last value of the array",
                "\tvar arr = [1, 2, 3];",
                "\tarr.pop();",
                "\tSys.alert(arr); // [1, 2]",
            ],
        },
    ),
    (
        "array.shift",
        Hint {
            detail: "Array's methods",
            lines: &[
                "Removes the first value of the array",
                "\tvar arr = [1, 2, 3];",
                "\tarr.shift();",
                "\tSys.alert(arr); // [2, 3]",
            ],
        },
    ),
    (
        "array.unshift",
        Hint {
            detail: "Array's methods",
            lines: &[
                "Inserts the value at the first index of the array",
                "\tvar arr = [1, 2, 3];",
                "\tarr.unshift(0);",
                "\tSys.alert(arr); // [0, 1, 2, 3]",
            ],
        },
    ),
    (
        "Sys.alert",
        Hint {
            detail: "Outputs a message",
            lines: &["Sys.alert(\"hello\");", "Shows a message with the given content to the user."],
        },
    ),
    (
        VARIABLE_HINT,
        Hint {
            detail: "Variable",
            lines: &["This variable was declared in the code."],
        },
    ),
    (
        FUNCTION_HINT,
        Hint {
            detail: "Function",
            lines: &["This function was declared in the code."],
        },
    ),
    (
        CLASS_HINT,
        Hint {
            detail: "Class",
            lines: &["This class was declared in the code."],
        },
    ),
];

pub fn hint(key: &str) -> Option<&'static Hint> {
    HINTS.iter().find(|(k, _)| *k == key).map(|(_, hint)| hint)
}
