#![forbid(unsafe_code)]

//! The catalog of components shipped with windkit.

/// One row of the builtin catalog.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BuiltinComponent {
    pub slug: &'static str,
    pub name: &'static str,
    pub files: &'static [&'static str],
    pub dependencies: &'static [&'static str],
    pub dev_dependencies: &'static [&'static str],
}

const fn component(
    slug: &'static str,
    name: &'static str,
    files: &'static [&'static str],
    dependencies: &'static [&'static str],
) -> BuiltinComponent {
    BuiltinComponent {
        slug,
        name,
        files,
        dependencies,
        dev_dependencies: &[],
    }
}

impl BuiltinComponent {
    const fn dev(mut self, dev_dependencies: &'static [&'static str]) -> Self {
        self.dev_dependencies = dev_dependencies;
        self
    }
}

/// Declaration order is the order `Registry::names()` reports.
pub(crate) static BUILTIN_COMPONENTS: &[BuiltinComponent] = &[
    component("accordion", "Accordion", &["accordion.ts"], &["utils"]),
    component("alert", "Alert", &["alert.ts"], &["utils"]),
    component("alert-dialog", "AlertDialog", &["alert-dialog.ts"], &["utils", "button", "dialog"]),
    component("aspect-ratio", "AspectRatio", &["aspect-ratio.ts"], &["utils"]),
    component("avatar", "Avatar", &["avatar.ts"], &["utils"]),
    component("badge", "Badge", &["badge.ts"], &["utils"]),
    component("breadcrumb", "Breadcrumb", &["breadcrumb.ts"], &["utils"]),
    component("button", "Button", &["button.ts"], &["utils"]),
    component("button-group", "ButtonGroup", &["button-group.ts"], &["utils", "button"]),
    component("calendar", "Calendar", &["calendar.ts"], &["utils", "button"]),
    component("card", "Card", &["card.ts"], &["utils"]),
    component("carousel", "Carousel", &["carousel.ts"], &["utils", "button"]),
    component("chart", "Chart", &["chart.ts"], &["utils"])
        .dev(&["chart.js"]),
    component("checkbox", "Checkbox", &["checkbox.ts"], &["utils"]),
    component("collapsible", "Collapsible", &["collapsible.ts"], &["utils"]),
    component("combobox", "Combobox", &["combobox.ts"], &["utils", "input", "popover"]),
    component("command", "Command", &["command.ts"], &["utils", "dialog", "input"]),
    component("context-menu", "ContextMenu", &["context-menu.ts"], &["utils"]),
    component(
        "data-table",
        "DataTable",
        &["data-table.ts"],
        &["utils", "table", "button", "input", "select"],
    ),
    component(
        "date-picker",
        "DatePicker",
        &["date-picker.ts"],
        &["utils", "calendar", "popover", "input", "button"],
    ),
    component("dialog", "Dialog", &["dialog.ts"], &["utils"]),
    component("drawer", "Drawer", &["drawer.ts"], &["utils"]),
    component("dropdown-menu", "DropdownMenu", &["dropdown-menu.ts"], &["utils"]),
    component("empty", "Empty", &["empty.ts"], &["utils"]),
    component("field", "Field", &["field.ts"], &["utils", "label"]),
    component("form", "Form", &["form.ts"], &["utils", "field", "button"]),
    component("hover-card", "HoverCard", &["hover-card.ts"], &["utils", "popover"]),
    component("input", "Input", &["input.ts"], &["utils"]),
    component("input-group", "InputGroup", &["input-group.ts"], &["utils", "input"]),
    component("input-otp", "InputOTP", &["input-otp.ts"], &["utils", "input"]),
    component("item", "Item", &["item.ts"], &["utils"]),
    component("kbd", "Kbd", &["kbd.ts"], &["utils"]),
    component("label", "Label", &["label.ts"], &["utils"]),
    component("menubar", "Menubar", &["menubar.ts"], &["utils"]),
    component("native-select", "NativeSelect", &["native-select.ts"], &["utils"]),
    component("navigation-menu", "NavigationMenu", &["navigation-menu.ts"], &["utils"]),
    component("pagination", "Pagination", &["pagination.ts"], &["utils", "button"]),
    component("popover", "Popover", &["popover.ts"], &["utils"]),
    component("progress", "Progress", &["progress.ts"], &["utils"]),
    component("radio-group", "RadioGroup", &["radio-group.ts"], &["utils"]),
    component("resizable", "Resizable", &["resizable.ts"], &["utils"]),
    component("scroll-area", "ScrollArea", &["scroll-area.ts"], &["utils"]),
    component("select", "Select", &["select.ts"], &["utils", "popover"]),
    component("separator", "Separator", &["separator.ts"], &["utils"]),
    component("sheet", "Sheet", &["sheet.ts"], &["utils", "dialog"]),
    component("sidebar", "Sidebar", &["sidebar.ts"], &["utils", "button", "sheet"]),
    component("skeleton", "Skeleton", &["skeleton.ts"], &["utils"]),
    component("slider", "Slider", &["slider.ts"], &["utils"]),
    component("sonner", "Sonner", &["sonner.ts"], &["utils"])
        .dev(&["sonner"]),
    component("spinner", "Spinner", &["spinner.ts"], &["utils"]),
    component("switch", "Switch", &["switch.ts"], &["utils"]),
    component("table", "Table", &["table.ts"], &["utils"]),
    component("tabs", "Tabs", &["tabs.ts"], &["utils"]),
    component("textarea", "Textarea", &["textarea.ts"], &["utils"]),
    component("toast", "Toast", &["toast.ts"], &["utils"]),
    component("toggle", "Toggle", &["toggle.ts"], &["utils"]),
    component("toggle-group", "ToggleGroup", &["toggle-group.ts"], &["utils", "toggle"]),
    component("tooltip", "Tooltip", &["tooltip.ts"], &["utils", "popover"]),
    component("typography", "Typography", &["typography.ts"], &["utils"]),
    component("navbar", "Navbar", &["navbar.ts"], &["utils"]),
    component("footer", "Footer", &["footer.ts"], &["utils"]),
    component("testimonial", "Testimonial", &["testimonial.ts"], &["utils"]),
    component("pricing-card", "PricingCard", &["pricing-card.ts"], &["utils"]),
    component("feature-card", "FeatureCard", &["feature-card.ts"], &["utils"]),
    component("hero", "Hero", &["hero.ts"], &["utils"]),
    component("stats", "Stats", &["stats.ts"], &["utils"]),
    component("modal", "Modal", &["modal.ts"], &["utils"]),
    component("hint", "Hint", &["hint.ts"], &["utils"]),
    component("notification", "Notification", &["notification.ts"], &["utils"]),
    component("chip", "Chip", &["chip.ts"], &["utils"]),
    component("divider", "Divider", &["divider.ts"], &["utils"]),
    component("timeline", "Timeline", &["timeline.ts"], &["utils"]),
    component("stepper", "Stepper", &["stepper.ts"], &["utils"]),
    component("file-upload", "FileUpload", &["file-upload.ts"], &["utils"]),
    component("avatar-group", "AvatarGroup", &["avatar-group.ts"], &["utils"]),
    component("rating", "Rating", &["rating.ts"], &["utils"]),
    component("counter", "Counter", &["counter.ts"], &["utils"]),
];
