mod test_checks;
mod test_commands;
mod test_config;
