//! Static file contents written by `init`

pub const JAVASCRIPT_SAMPLE: &str = r#"function main(args) {
    let name = args.name || 'stranger'
    let greeting = 'Hello ' + name + '!'
    console.log(greeting)
    return {"body": greeting}
}

exports.main = main
"#;

pub const TYPESCRIPT_SAMPLE: &str = r#"export function main(args: {}): {} {
    let name: string = args['name'] || 'stranger'
    let greeting: string = 'Hello ' + name + '!'
    console.log(greeting)
    return { body: greeting }
}
"#;

pub const PYTHON_SAMPLE: &str = r#"def main(args):
    name = args.get("name", "stranger")
    greeting = "Hello " + name + "!"
    print(greeting)
    return {"body": greeting}
"#;

pub const GO_SAMPLE: &str = r#"package main

func Main(args map[string]interface{}) map[string]interface{} {
	name, ok := args["name"].(string)
	if !ok {
		name = "stranger"
	}
	msg := make(map[string]interface{})
	msg["body"] = "Hello " + name + "!"
	return msg
}
"#;

pub const PHP_SAMPLE: &str = r#"<?php
function main(array $args) : array
{
    $name = $args["name"] ?? "stranger";
    $greeting = "Hello $name!";
    echo $greeting;
    return ["body" => $greeting];
}
"#;

/// Entries every project keeps out of version control
pub const GITIGNORE: &str = ".nimbella
.deployed
__deployer__.zip
__pycache__
node_modules
package-lock.json
.DS_Store
";

/// Appended to `.gitignore` for TypeScript projects
pub const GITIGNORE_TYPESCRIPT: &str = "lib
";

pub const TYPESCRIPT_PACKAGE_JSON: &str = r#"{
  "name": "hello",
  "version": "1.0.0",
  "description": "",
  "main": "lib/hello.js",
  "devDependencies": {
    "typescript": "^4.5.5"
  },
  "scripts": {
    "build": "tsc -b"
  }
}
"#;

pub const TYPESCRIPT_TSCONFIG: &str = r#"{
  "compilerOptions": {
    "target": "es6",
    "module": "commonjs",
    "outDir": "lib",
    "rootDir": "src",
    "esModuleInterop": true
  }
}
"#;

/// Tells the builder to ship the compiled output only
pub const TYPESCRIPT_INCLUDE: &str = "lib\n";
