mod registry_selection;
mod screening_properties;
