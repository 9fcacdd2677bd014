mod cmdline_overrides;
